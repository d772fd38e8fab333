/// Finds the next `<path` start tag, skipping tags that merely start with `path`.
fn find_path_tag(svg: &str) -> Option<usize> {
    let mut offset = 0;
    while let Some(idx) = svg[offset..].find("<path") {
        let start = offset + idx;
        match svg[start + 5..].chars().next() {
            Some(c) if c.is_whitespace() || c == '/' || c == '>' => return Some(start),
            Some(_) => offset = start + 5,
            None => return None,
        }
    }
    None
}

/// Returns the length of a start tag up to and including its closing `>`, ignoring any `>`
/// inside quoted attribute values.
fn tag_len(tag: &str) -> usize {
    let mut quote = None;
    for (idx, c) in tag.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return idx + 1,
            None => {}
        }
    }
    tag.len()
}

/// Returns the length of an attribute's `= value` part, or 0 if it has none.
fn attribute_value_len(s: &str) -> usize {
    let after_ws = s.trim_start();
    let Some(after_eq) = after_ws.strip_prefix('=') else {
        return 0;
    };
    let value = after_eq.trim_start();
    let lead = s.len() - value.len();
    match value.chars().next() {
        Some(quote @ ('"' | '\'')) => {
            lead + value[1..].find(quote).map_or(value.len(), |end| end + 2)
        }
        _ => lead + value.find(|c: char| c.is_whitespace() || c == '>').unwrap_or(value.len()),
    }
}

/// Copies the attribute list of a tag, dropping any `fill` attributes.
fn strip_fill(attrs: &str) -> String {
    let mut out = String::with_capacity(attrs.len());
    let mut rest = attrs;
    loop {
        let trimmed = rest.trim_start();
        let whitespace = &rest[..rest.len() - trimmed.len()];
        let name_len = trimmed
            .find(|c: char| c == '=' || c == '/' || c == '>' || c.is_whitespace())
            .unwrap_or(trimmed.len());
        if name_len == 0 {
            out.push_str(rest);
            return out;
        }

        let attr_len = name_len + attribute_value_len(&trimmed[name_len..]);
        if &trimmed[..name_len] != "fill" {
            out.push_str(whitespace);
            out.push_str(&trimmed[..attr_len]);
        }
        rest = &trimmed[attr_len..];
    }
}

/// Sets the `fill` of every `<path>` element in an SVG document.
///
/// Existing fills on paths are replaced. Everything outside path start tags is copied unchanged.
pub fn recolor_paths(svg: &str, fill: &str) -> String {
    let fill = fill.replace('"', "&quot;");
    let mut out = String::with_capacity(svg.len());
    let mut rest = svg;
    while let Some(start) = find_path_tag(rest) {
        out.push_str(&rest[..start]);
        let tag = &rest[start..];
        let len = tag_len(tag);
        out.push_str("<path fill=\"");
        out.push_str(&fill);
        out.push('"');
        out.push_str(&strip_fill(&tag[5..len]));
        rest = &tag[len..];
    }
    out.push_str(rest);
    out
}
