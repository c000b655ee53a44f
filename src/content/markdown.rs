//! Markdown rendering with syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use super::frontmatter::split_front_matter;

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_theme("base16-ocean.dark")
    }

    /// Create with a specific syntect theme
    pub fn with_theme(theme: &str) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
        }
    }

    /// Render a whole document body for a detail page.
    ///
    /// The front-matter block and the first `# ` heading are removed (the page
    /// template renders the title itself) and comparison operators next to
    /// digits are escaped before conversion.
    pub fn render_document(&self, markdown: &str) -> String {
        let body = split_front_matter(markdown)
            .map(|(_, body)| body)
            .unwrap_or(markdown);
        self.render_body(body)
    }

    /// Render a body whose front-matter was already split off
    pub fn render_body(&self, body: &str) -> String {
        let body = strip_first_heading(body);
        let body = escape_digit_comparisons(&body);
        self.render(&body)
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        // Front-matter is handled by the caller, so no metadata blocks here
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        // (language, source) of the fenced block being collected
        let mut code_block: Option<(Option<String>, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split(|c: char| c.is_whitespace() || c == ',')
                            .next()
                            .filter(|lang| !lang.is_empty())
                            .map(str::to_string),
                        CodeBlockKind::Indented => None,
                    };
                    code_block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, source)) = code_block.take() {
                        let highlighted = self.highlight_code(&source, lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if code_block.is_some() => {
                    if let Some((_, source)) = code_block.as_mut() {
                        source.push_str(&text);
                    }
                }
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());
        html_output
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let Some(lang) = lang else {
            return format!("<pre><code>{}</code></pre>", html_escape(code));
        };

        let plain = || {
            format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                html_escape(lang),
                html_escape(code)
            )
        };

        let Some(syntax) = self.syntax_set.find_syntax_by_token(lang) else {
            return plain();
        };

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());
        let Some(theme) = theme else {
            return plain();
        };

        match highlighted_html_for_string(code, &self.syntax_set, syntax, theme) {
            Ok(highlighted) => format!(
                r#"<figure class="highlight language-{}">{}</figure>"#,
                html_escape(lang),
                highlighted
            ),
            Err(e) => {
                tracing::debug!("Highlighting {} failed: {}", lang, e);
                plain()
            }
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Fence marker opening a code block on this line, if any
fn fence_marker(line: &str) -> Option<&'static str> {
    let trimmed = line.trim_start();
    if trimmed.starts_with("```") {
        Some("```")
    } else if trimmed.starts_with("~~~") {
        Some("~~~")
    } else {
        None
    }
}

/// Remove the first ATX level-1 heading outside code fences
pub fn strip_first_heading(markdown: &str) -> String {
    let mut output = String::with_capacity(markdown.len());
    let mut fence: Option<&str> = None;
    let mut stripped = false;

    for line in markdown.split_inclusive('\n') {
        if let Some(marker) = fence {
            if line.trim_start().starts_with(marker) {
                fence = None;
            }
            output.push_str(line);
            continue;
        }
        if let Some(marker) = fence_marker(line) {
            fence = Some(marker);
            output.push_str(line);
            continue;
        }

        if !stripped && is_h1(line) {
            stripped = true;
            continue;
        }
        output.push_str(line);
    }

    output
}

fn is_h1(line: &str) -> bool {
    let indent = line.len() - line.trim_start_matches(' ').len();
    if indent > 3 {
        return false;
    }
    let rest = line.trim_start_matches(' ').trim_end_matches(['\n', '\r']);
    rest == "#" || rest.starts_with("# ") || rest.starts_with("#\t")
}

/// Escape `<` and `>` used as comparison operators before a number.
///
/// A `<` followed (after optional spaces) by a digit can never open a tag, so
/// it becomes `&lt;`. A `>` becomes `&gt;` when it follows whitespace, is
/// followed by a digit, and is not the blockquote marker of the line. Fenced
/// blocks and inline code spans are left alone.
pub fn escape_digit_comparisons(markdown: &str) -> String {
    let mut output = String::with_capacity(markdown.len());
    let mut fence: Option<&str> = None;

    for line in markdown.split_inclusive('\n') {
        if let Some(marker) = fence {
            if line.trim_start().starts_with(marker) {
                fence = None;
            }
            output.push_str(line);
            continue;
        }
        if let Some(marker) = fence_marker(line) {
            fence = Some(marker);
            output.push_str(line);
            continue;
        }
        escape_line(line, &mut output);
    }

    output
}

fn escape_line(line: &str, output: &mut String) {
    let mut in_code = false;
    let mut seen_text = false;
    let mut prev: Option<char> = None;

    for (i, c) in line.char_indices() {
        let next_is_digit = || {
            line[i + c.len_utf8()..]
                .trim_start_matches([' ', '\t'])
                .starts_with(|n: char| n.is_ascii_digit())
        };

        match c {
            '`' => {
                in_code = !in_code;
                output.push(c);
            }
            '<' if !in_code && next_is_digit() => output.push_str("&lt;"),
            '>' if !in_code
                && seen_text
                && prev.is_some_and(char::is_whitespace)
                && next_is_digit() =>
            {
                output.push_str("&gt;")
            }
            _ => output.push(c),
        }

        if !c.is_whitespace() {
            seen_text = true;
        }
        prev = Some(c);
    }
}

/// Simple HTML escaping
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
