/// Filename for a saved tailored resume: `Resume_{Company}_{Title}.pdf`,
/// with whitespace runs replaced by underscores.
pub fn tailored_filename(company: &str, title: &str) -> String {
    let company = sanitize_part(company);
    let title = sanitize_part(title);
    format!("Resume_{company}_{title}.pdf")
}

fn sanitize_part(input: &str) -> String {
    let mut cleaned = String::with_capacity(input.len());
    let mut prev_underscore = false;
    for c in input.chars() {
        if c.is_whitespace() || c == '_' {
            if !prev_underscore {
                cleaned.push('_');
            }
            prev_underscore = true;
        } else if !is_forbidden(c) {
            cleaned.push(c);
            prev_underscore = false;
        }
    }
    let cleaned = cleaned.trim_matches(&['_', ' ', '.'][..]).to_string();
    let mut part = if cleaned.is_empty() {
        "Unknown".to_string()
    } else {
        cleaned
    };
    if part.len() > 60 {
        let mut cut = 60;
        while !part.is_char_boundary(cut) {
            cut -= 1;
        }
        part.truncate(cut);
    }
    part
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
