//! Inline style strings (`name:value;name:value;`)

/// Byte range of the `name:` property in `style`, including its trailing `;`
/// when there is one.
fn find_property(style: &str, name: &str) -> Option<(usize, usize)> {
    let key = format!("{}:", name);
    let mut offset = 0;
    for part in style.split(';') {
        if part.starts_with(&key) {
            let end = (offset + part.len() + 1).min(style.len());
            return Some((offset, end));
        }
        offset += part.len() + 1;
    }
    None
}

/// Value of property `name`, if the style declares it.
pub fn style_property<'a>(style: &'a str, name: &str) -> Option<&'a str> {
    let (start, end) = find_property(style, name)?;
    let declaration = style[start..end].trim_end_matches(';');
    Some(&declaration[name.len() + 1..])
}

/// Replace the value of property `name`, keeping every other declaration.
/// Declarations are normalized to end with `;`. A style without the property
/// is returned unchanged apart from that normalization.
pub fn replace_style_property(style: &str, name: &str, value: &str) -> String {
    let key = format!("{}:", name);
    let mut out = String::new();
    for part in style.split(';') {
        if part.starts_with(&key) {
            out.push_str(&format!("{}:{};", name, value));
        } else if !part.is_empty() {
            out.push_str(part);
            out.push(';');
        }
    }
    out
}
