//! Maps the narrative fragment from the simulation service onto styled text
//! spans. The fragment is interpreted as-is, never escaped or sanitized; the
//! service is trusted to emit well-formed formatting.
//!
//! Recognized markup: `<b>`/`<strong>`, `<i>`/`<em>`, `<br>`, `<p>`, plus the
//! `**bold**` marker the service uses inside narrative text. Anything else
//! passes through literally.

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSpan {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

enum Token {
    BoldOpen,
    BoldClose,
    ItalicOpen,
    ItalicClose,
    LineBreak,
    ParagraphOpen,
    ParagraphClose,
}

fn classify_tag(tag: &str) -> Option<Token> {
    let name = tag.trim().trim_end_matches('/').trim().to_ascii_lowercase();
    match name.as_str() {
        "b" | "strong" => Some(Token::BoldOpen),
        "/b" | "/strong" => Some(Token::BoldClose),
        "i" | "em" => Some(Token::ItalicOpen),
        "/i" | "/em" => Some(Token::ItalicClose),
        "br" => Some(Token::LineBreak),
        "p" => Some(Token::ParagraphOpen),
        "/p" => Some(Token::ParagraphClose),
        _ => None,
    }
}

/// Splits the fragment into lines of styled spans. Lines may be empty; the
/// caller renders those as vertical space.
pub fn parse_markup(markup: &str) -> Vec<Vec<MarkupSpan>> {
    let chars: Vec<char> = markup.chars().collect();
    let mut lines: Vec<Vec<MarkupSpan>> = Vec::new();
    let mut line: Vec<MarkupSpan> = Vec::new();
    let mut buffer = String::new();
    let mut bold_depth = 0usize;
    let mut italic_depth = 0usize;
    let mut star_bold = false;

    let flush = |buffer: &mut String, line: &mut Vec<MarkupSpan>, bold: bool, italic: bool| {
        if !buffer.is_empty() {
            line.push(MarkupSpan {
                text: std::mem::take(buffer),
                bold,
                italic,
            });
        }
    };

    let mut i = 0;
    while i < chars.len() {
        let bold = bold_depth > 0 || star_bold;
        let italic = italic_depth > 0;
        match chars[i] {
            '\n' => {
                flush(&mut buffer, &mut line, bold, italic);
                lines.push(std::mem::take(&mut line));
                i += 1;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                flush(&mut buffer, &mut line, bold, italic);
                star_bold = !star_bold;
                i += 2;
            }
            '<' => {
                let close = chars[i..].iter().position(|&c| c == '>');
                let token = close.and_then(|offset| {
                    let tag: String = chars[i + 1..i + offset].iter().collect();
                    classify_tag(&tag).map(|token| (token, offset))
                });
                match token {
                    Some((token, offset)) => {
                        flush(&mut buffer, &mut line, bold, italic);
                        match token {
                            Token::BoldOpen => bold_depth += 1,
                            Token::BoldClose => bold_depth = bold_depth.saturating_sub(1),
                            Token::ItalicOpen => italic_depth += 1,
                            Token::ItalicClose => italic_depth = italic_depth.saturating_sub(1),
                            Token::LineBreak | Token::ParagraphClose => {
                                lines.push(std::mem::take(&mut line));
                            }
                            Token::ParagraphOpen => {
                                if !line.is_empty() {
                                    lines.push(std::mem::take(&mut line));
                                }
                            }
                        }
                        i += offset + 1;
                    }
                    None => {
                        buffer.push('<');
                        i += 1;
                    }
                }
            }
            c => {
                buffer.push(c);
                i += 1;
            }
        }
    }

    flush(
        &mut buffer,
        &mut line,
        bold_depth > 0 || star_bold,
        italic_depth > 0,
    );
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}
