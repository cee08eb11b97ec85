//! Shared escape normalization for format adapters.
//!
//! Android and iOS store values with XML entities and backslash escapes;
//! web literals embed template variables (`{num}`) and markup (`<span>`).
//! Normalization decodes the escapes without corrupting the embedded
//! variables/markup: those spans are first masked with reversible
//! base64-encoded tokens, the escape transforms run, and the spans are
//! restored afterwards.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TEMPLATE_VAR: Regex = Regex::new(r"\{[^{}]+\}").unwrap();
    static ref MARKUP_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();
    static ref MASK_TOKEN: Regex = Regex::new(r"__LSQ_([A-Za-z0-9_-]*)__").unwrap();
    // Platform variable spellings masked to a common `{var}` for
    // cross-platform comparison: printf-style (`%s`, `%1$d`, `%@`), shell
    // style (`$amount`), template style (`{num}`), and Xcode editor tokens.
    static ref VARIABLE_MASKS: [Regex; 4] = [
        Regex::new(r"%([0-9]+\$)?[@sdf]").unwrap(),
        Regex::new(r"\$[a-zA-Z0-9_]+").unwrap(),
        Regex::new(r"\{\w*\}").unwrap(),
        Regex::new(r"<#[\w\s]+#>").unwrap(),
    ];
}

/// Decodes escapes in one extracted value: HTML entities (`&apos;`,
/// `&quot;`, `&lt;`, `&gt;`, `&amp;`), escaped quotes (`\"`, `\'`), and
/// literal `\n` sequences. Template variables and markup tags survive
/// untouched.
pub fn normalize_value(value: &str) -> String {
    let mut text = mask_protected(value);

    text = text.replace("\\\"", "\"").replace("\\'", "'");
    text = text
        .replace("&apos;", "'")
        .replace("&quot;", "\"")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&");
    text = text.replace("\\n", "\n");

    unmask_protected(&text).trim().to_string()
}

/// Replaces every `{...}` template variable and `<...>` markup tag with a
/// reversible token carrying the masked span base64-encoded.
fn mask_protected(value: &str) -> String {
    let masked = TEMPLATE_VAR
        .replace_all(value, |caps: &regex::Captures| token_for(&caps[0]))
        .into_owned();
    MARKUP_TAG
        .replace_all(&masked, |caps: &regex::Captures| token_for(&caps[0]))
        .into_owned()
}

/// Restores masked spans. Markup tags can enclose already-masked template
/// variables, so decoding repeats until no token remains.
fn unmask_protected(value: &str) -> String {
    let mut text = value.to_string();
    while MASK_TOKEN.is_match(&text) {
        let next = MASK_TOKEN
            .replace_all(&text, |caps: &regex::Captures| {
                match URL_SAFE_NO_PAD.decode(&caps[1]) {
                    Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
                    Err(_) => caps[0].to_string(),
                }
            })
            .into_owned();
        if next == text {
            break;
        }
        text = next;
    }
    text
}

fn token_for(span: &str) -> String {
    format!("__LSQ_{}__", URL_SAFE_NO_PAD.encode(span))
}

/// Masks every platform-specific variable spelling to `{var}` so the same
/// text carrying iOS, Android, or web placeholders compares equal.
pub fn mask_variables(value: &str) -> String {
    let mut text = value.to_string();
    for mask in VARIABLE_MASKS.iter() {
        text = mask.replace_all(&text, "{var}").into_owned();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entities_are_decoded() {
        assert_eq!(normalize_value("it&apos;s &quot;fine&quot;"), r#"it's "fine""#);
        assert_eq!(normalize_value("a &lt; b &amp; c &gt; d"), "a < b & c > d");
    }

    #[test]
    fn test_escaped_quotes_are_unescaped() {
        assert_eq!(normalize_value(r#"say \"hi\""#), r#"say "hi""#);
        assert_eq!(normalize_value(r"it\'s ok"), "it's ok");
    }

    #[test]
    fn test_literal_newline_becomes_newline() {
        assert_eq!(normalize_value(r"line1\nline2"), "line1\nline2");
    }

    #[test]
    fn test_template_variable_survives() {
        assert_eq!(normalize_value(r"earn {num}\n today"), "earn {num}\n today");
    }

    #[test]
    fn test_markup_tag_survives_quote_unescaping() {
        // The escaped quote inside the tag must not be unescaped.
        let input = r#"<span class=\"big\">hi</span>"#;
        assert_eq!(normalize_value(input), input);
    }

    #[test]
    fn test_markup_enclosing_template_variable() {
        let input = "<b>{num} USDT</b> 豪礼";
        assert_eq!(normalize_value(input), input);
    }

    #[test]
    fn test_result_is_trimmed() {
        assert_eq!(normalize_value("  padded  "), "padded");
    }

    #[test]
    fn test_mask_variables_unifies_platform_spellings() {
        assert_eq!(mask_variables("Hello %1$s, %d items"), "Hello {var}, {var} items");
        assert_eq!(mask_variables("Hello %@"), "Hello {var}");
        assert_eq!(mask_variables("Paid $amount now"), "Paid {var} now");
        assert_eq!(mask_variables("Earn {num} today"), "Earn {var} today");
        assert_eq!(mask_variables("Insert <#token here#>"), "Insert {var}");
    }

    #[test]
    fn test_mask_variables_equalizes_across_platforms() {
        let android = mask_variables("You have %1$d coupons");
        let ios = mask_variables("You have %d coupons");
        let web = mask_variables("You have {count} coupons");
        assert_eq!(android, ios);
        assert_eq!(ios, web);
    }
}
