use std::borrow::Cow;
use std::path::Path;

use crate::errors::GenError;
use crate::wire::{ComposedPrompt, Preferences};

/// Bumped whenever the instruction wording changes, so saved runs can be
/// traced back to the template that produced them.
pub const TEMPLATE_VERSION: &str = "2025-06-01";

pub const COLOR_SLOT: &str = "{{COLOR_GUIDANCE}}";
pub const FONT_SLOT: &str = "{{FONT_GUIDANCE}}";

/// Placed between the system instruction and the user's request.
pub const PROMPT_SEPARATOR: &str = "\n\nUser Request: ";

/// Lower bound on the rendered instruction length. Anything shorter means the
/// structural requirements block went missing.
pub const MIN_INSTRUCTION_CHARS: usize = 2_500;

/// Only ever emitted in the default color branch.
pub const PURPLE_EXCLUSION: &str =
    "Do NOT use purple, violet, indigo, lavender or magenta tones anywhere in the default palette.";

fn default_color_guidance() -> &'static str {
r#"COLOR PALETTE (default):
- Use a modern, professional palette built from these families only: deep navy and slate blues, teal or emerald accents, warm neutrals (stone, sand, warm gray), and crisp whites with near-black text.
- Every text/background pair MUST reach a contrast ratio of at least 4.5:1 (WCAG AA); large headings at least 3:1.
- Use one primary accent and at most one secondary accent; keep large surfaces neutral.
- Do NOT use purple, violet, indigo, lavender or magenta tones anywhere in the default palette."#
}

fn default_font_guidance() -> &'static str {
r#"TYPOGRAPHY (default):
- Load professional sans-serif families from Google Fonts via a <link> tag in <head>: Inter, Poppins, Montserrat or DM Sans (pick at most two).
- Always declare fallbacks: system-ui, -apple-system, "Segoe UI", Roboto, sans-serif.
- Use a clear type scale (e.g. 14/16/20/28/40/56px) with comfortable line-height (1.5 body, 1.2 headings)."#
}

fn explicit_color_guidance(colors: &str) -> String {
    format!(
"COLOR PALETTE (requested by the user):
- Use this color scheme: {colors}. Apply it throughout with proper contrast ratios.
- Derive tints and shades of the requested colors for surfaces, borders and hover states.
- Every text/background pair MUST stay readable (WCAG AA, 4.5:1 for body text)."
    )
}

fn explicit_font_guidance(fonts: &str) -> String {
    format!(
"TYPOGRAPHY (requested by the user):
- Use the {fonts} font family from Google Fonts with proper fallbacks (system-ui, -apple-system, \"Segoe UI\", sans-serif).
- Load it via a <link> tag in <head> and apply it consistently to headings and body text."
    )
}

const SYSTEM_TEMPLATE: &str = r#"You are an expert front-end designer and developer. Generate a single, complete, production-quality HTML page for the user's request below.

OUTPUT FORMAT (MANDATORY):
- Return ONLY the raw HTML document, starting with <!DOCTYPE html> and ending with </html>.
- Do NOT wrap the output in markdown code fences. Do NOT add explanations before or after the document.
- All CSS goes in a single <style> block in <head>; any JavaScript goes in a single <script> block before </body>.
- No external CSS frameworks; Google Fonts is the only allowed stylesheet link.

{{COLOR_GUIDANCE}}

{{FONT_GUIDANCE}}

STRUCTURE & SIZE (MANDATORY):
- The document must be substantial: at least 400 lines of well-formatted HTML and CSS.
- Include at least 6 distinct, fully built sections, for example: navigation header, hero, features or services grid, about / story, gallery or showcase, testimonials, pricing or stats, FAQ, call to action, footer.
- Every section must contain real, domain-appropriate copy. No lorem ipsum, no "content goes here" placeholders.
- Use semantic elements (header, nav, main, section, article, footer) and a logical heading hierarchy with exactly one <h1>.

IMAGES (MANDATORY):
- Include at least 8 <img> elements across the page.
- All images MUST come from the placeholder service https://picsum.photos, e.g. https://picsum.photos/seed/<keyword>/800/600, using a different descriptive seed per image.
- Every <img> needs a meaningful alt attribute, explicit width/height or aspect-ratio, and object-fit: cover.

BACKGROUNDS (MANDATORY):
- NEVER put a raster background image (url(...) with a photo or picsum link) on the html or body element.
- Build page-level backgrounds with CSS only: linear/radial gradients, subtle repeating patterns, or noise-free textures made from gradients.
- Section-level hero images must use <img> elements or gradients, not body backgrounds.

DESIGN QUALITY:
- Fully responsive: mobile-first layout with breakpoints around 640px, 768px and 1024px; use CSS grid and flexbox.
- Consistent spacing scale, rounded corners, soft shadows and clear visual hierarchy.
- Interactive states: hover and focus-visible styles on every link and button; smooth transitions that respect prefers-reduced-motion.
- A sticky or clearly visible navigation bar with working in-page anchor links to each section.
- Accessible by default: sufficient contrast, labelled form controls, aria-labels on icon-only buttons, keyboard reachable menus.

COMPLETENESS (MANDATORY):
- Output the COMPLETE document markup. Never truncate, abbreviate or summarize.
- Never write "...", "<!-- more sections -->", "rest of the code" or similar shortcuts.
- Close every tag you open; the final characters of your answer must be </html>."#;

/// The instruction template with its two substitution points.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    text: Cow<'static, str>,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PromptTemplate {
    pub fn builtin() -> Self {
        Self { text: Cow::Borrowed(SYSTEM_TEMPLATE) }
    }

    /// Load a replacement template. Both substitution points must be present.
    pub fn from_text(text: String) -> Result<Self, GenError> {
        for slot in [COLOR_SLOT, FONT_SLOT] {
            if !text.contains(slot) {
                return Err(GenError::Configuration(format!("prompt template is missing the {slot} placeholder")));
            }
        }
        Ok(Self { text: Cow::Owned(text) })
    }

    pub fn from_file(path: &Path) -> Result<Self, GenError> {
        let text = fs_err::read_to_string(path).map_err(|e| GenError::Configuration(e.to_string()))?;
        Self::from_text(text)
    }

    /// Render the system instruction for the given preferences.
    pub fn render(&self, prefs: &Preferences) -> String {
        let colors = match prefs.colors.as_deref() {
            Some(c) => explicit_color_guidance(c),
            None => default_color_guidance().to_string(),
        };
        let fonts = match prefs.fonts.as_deref() {
            Some(f) => explicit_font_guidance(f),
            None => default_font_guidance().to_string(),
        };
        self.text.replace(COLOR_SLOT, &colors).replace(FONT_SLOT, &fonts)
    }

    pub fn compose(&self, user_prompt: &str, prefs: &Preferences) -> ComposedPrompt {
        ComposedPrompt {
            system_instruction: self.render(prefs),
            user_prompt: user_prompt.to_string(),
        }
    }
}

/// System instruction from the built-in template.
pub fn system_instruction(prefs: &Preferences) -> String {
    PromptTemplate::builtin().render(prefs)
}

pub fn compose(user_prompt: &str, prefs: &Preferences) -> ComposedPrompt {
    PromptTemplate::builtin().compose(user_prompt, prefs)
}
