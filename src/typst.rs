use crate::config::Config;
use crate::output::{RenderedDocument, TocEntry};
use crate::style::{FontFamily, VisualStyle};

/// Convert rendered segments to Typst markup
pub fn document_to_typst(doc: &RenderedDocument, config: &Config) -> String {
    let table = config.style_table();
    let mut out = preamble(config);

    let mut at_line_start = true;
    for segment in &doc.segments {
        if segment.text.is_empty() {
            continue;
        }
        let style = table.resolve(segment.block_tag, segment.char_tag);
        let plain = style.size == table.base.get()
            && style.family == FontFamily::Proportional
            && !style.bold
            && !style.italic
            && style.background.is_none();

        for (i, line) in segment.text.split('\n').enumerate() {
            if i > 0 {
                out.push_str(" \\\n");
                at_line_start = true;
            }
            if line.is_empty() {
                continue;
            }
            // Wrap margins have no per-line equivalent; only line starts are indented
            if at_line_start && style.first_margin > 0 {
                out.push_str(&format!("#h({}pt)", style.first_margin));
            }
            at_line_start = false;

            if plain {
                escape_markup(line, &mut out);
            } else {
                styled_run(line, &style, &mut out);
            }
        }
    }

    out.push('\n');
    out
}

/// Convert TOC entries to a nested Typst list
pub fn toc_to_typst(toc: &[TocEntry]) -> String {
    let mut out = String::new();
    for entry in toc {
        let label = entry.label.trim_start_matches(' ');
        let depth = (entry.label.len() - label.len()) / 4;
        out.push_str(&"  ".repeat(depth));
        out.push_str("- ");
        escape_markup(label, &mut out);
        out.push('\n');
    }
    out
}

fn preamble(config: &Config) -> String {
    let mut out = String::new();
    out.push_str("#set text(");
    if let Some(fonts) = font_list(&config.font.normal) {
        out.push_str(&format!("font: {fonts}, "));
    }
    out.push_str(&format!("size: {}pt)\n", config.style_table().base.get()));
    if let Some(fonts) = font_list(&config.font.fixed) {
        out.push_str(&format!("#show raw: set text(font: {fonts})\n"));
    }
    out.push_str("#set par(linebreaks: \"optimized\")\n\n");
    out
}

fn font_list(names: &[String]) -> Option<String> {
    match names {
        [] => None,
        [name] => Some(format!("\"{}\"", escape_string(name))),
        names => {
            let quoted: Vec<String> = names
                .iter()
                .map(|name| format!("\"{}\"", escape_string(name)))
                .collect();
            Some(format!("({})", quoted.join(", ")))
        }
    }
}

fn styled_run(text: &str, style: &VisualStyle, out: &mut String) {
    let mut args = vec![format!("size: {}pt", style.size)];
    if style.bold {
        args.push("weight: \"bold\"".to_string());
    }
    if style.italic {
        args.push("style: \"italic\"".to_string());
    }

    let mut body = String::new();
    match style.family {
        FontFamily::Fixed => {
            body.push_str("#raw(\"");
            body.push_str(&escape_string(text));
            body.push_str("\")");
        }
        FontFamily::Proportional => escape_markup(text, &mut body),
    }

    let run = format!("#text({})[{}]", args.join(", "), body);
    match &style.background {
        Some(color) => out.push_str(&format!("#highlight(fill: rgb(\"{color}\"))[{run}]")),
        None => out.push_str(&run),
    }
}

fn escape_markup(text: &str, out: &mut String) {
    // `1.` at the start of a run is an enum marker
    let digits = text.chars().take_while(char::is_ascii_digit).count();
    let enum_dot = (digits > 0 && text[digits..].starts_with('.')).then_some(digits);

    for (i, ch) in text.chars().enumerate() {
        match ch {
            '.' if Some(i) == enum_dot => out.push_str("\\."),
            '#' | '*' | '_' | '@' | '$' | '\\' | '`' | '<' | '>' | '[' | ']' | '/' | '~' => {
                out.push('\\');
                out.push(ch);
            }
            // List, enum and heading markers only matter at the start of a run
            '=' | '-' | '+' if i == 0 => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
}

fn escape_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::TextSegment;
    use crate::style::{BlockTag, CharTag};

    fn preamble_text() -> String {
        preamble(&Config::compiled_default())
    }

    fn doc(segments: &[(&str, BlockTag, CharTag)]) -> RenderedDocument {
        RenderedDocument {
            segments: segments
                .iter()
                .map(|(text, block_tag, char_tag)| TextSegment {
                    text: text.to_string(),
                    block_tag: *block_tag,
                    char_tag: *char_tag,
                })
                .collect(),
            toc: Vec::new(),
        }
    }

    fn render(segments: &[(&str, BlockTag, CharTag)]) -> String {
        document_to_typst(&doc(segments), &Config::compiled_default())
    }

    #[test]
    fn preamble_sets_fonts() {
        assert_eq!(
            preamble_text(),
            concat!(
                "#set text(font: (\"DejaVu Sans\", \"Arial\", \"Helvetica\"), size: 10pt)\n",
                "#show raw: set text(font: (\"DejaVu Sans Mono\", \"Courier New\"))\n",
                "#set par(linebreaks: \"optimized\")\n\n",
            )
        );
    }

    #[test]
    fn plain_paragraph() {
        assert_eq!(
            render(&[("Hello world", BlockTag::Normal, CharTag::None)]),
            format!("{}Hello world\n", preamble_text())
        );
    }

    #[test]
    fn heading_is_scaled_and_bold() {
        assert_eq!(
            render(&[("Intro", BlockTag::Heading(1), CharTag::None)]),
            format!("{}#text(size: 16pt, weight: \"bold\")[Intro]\n", preamble_text())
        );
    }

    #[test]
    fn emphasis_is_italic() {
        assert_eq!(
            render(&[("note", BlockTag::Normal, CharTag::Emphasis)]),
            format!("{}#text(size: 10pt, style: \"italic\")[note]\n", preamble_text())
        );
    }

    #[test]
    fn preblock_lines_are_raw_and_indented() {
        assert_eq!(
            render(&[("a = \"1\"\nb", BlockTag::PreBlock, CharTag::None)]),
            format!(
                "{}#h(25pt)#highlight(fill: rgb(\"#eeffcc\"))[#text(size: 9pt)[#raw(\"a = \\\"1\\\"\")]] \\\n\
                 #h(25pt)#highlight(fill: rgb(\"#eeffcc\"))[#text(size: 9pt)[#raw(\"b\")]]\n",
                preamble_text()
            )
        );
    }

    #[test]
    fn list_items_indent_at_line_start() {
        assert_eq!(
            render(&[
                ("\n\n* ", BlockTag::Indent(1), CharTag::None),
                ("item", BlockTag::Indent(1), CharTag::None),
            ]),
            format!("{} \\\n \\\n#h(25pt)\\* item\n", preamble_text())
        );
    }

    #[test]
    fn escapes_special_chars() {
        assert_eq!(
            render(&[("a # b // c", BlockTag::Normal, CharTag::None)]),
            format!("{}a \\# b \\/\\/ c\n", preamble_text())
        );
        assert_eq!(
            render(&[("- not a list", BlockTag::Normal, CharTag::None)]),
            format!("{}\\- not a list\n", preamble_text())
        );
        assert_eq!(
            render(&[("1. First step", BlockTag::Normal, CharTag::None)]),
            format!("{}1\\. First step\n", preamble_text())
        );
        assert_eq!(
            render(&[("Version 3.12. Done", BlockTag::Normal, CharTag::None)]),
            format!("{}Version 3.12. Done\n", preamble_text())
        );
    }

    #[test]
    fn toc_is_nested_list() {
        let toc = vec![
            TocEntry {
                label: "IDLE".to_string(),
                position: 4,
            },
            TocEntry {
                label: "    Menus".to_string(),
                position: 20,
            },
            TocEntry {
                label: "        File menu (Shell_and_Editor)".to_string(),
                position: 40,
            },
        ];
        assert_eq!(
            toc_to_typst(&toc),
            "- IDLE\n  - Menus\n    - File menu (Shell\\_and\\_Editor)\n"
        );
    }
}
