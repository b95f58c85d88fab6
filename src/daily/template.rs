use chrono::{DateTime, Local};

use crate::daily::format::format_date;

/// Fills in the `{{...}}` placeholders of a note template.
///
/// Supported: `{{title}}`, `{{date}}` (`YYYY-MM-DD`), `{{time}}` (`HH:MM`)
/// and `{{date:PATTERN}}` where `PATTERN` uses the same tokens as the daily
/// note format (`{{date:YYYY-MM-DD}}`, `{{date:MMM DD YYYY}}`, ...).
/// Unknown placeholders are left untouched, including `{{time:...}}`: the
/// token table has no hour or minute tokens.
pub fn render(template: &str, title: &str, now: &DateTime<Local>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };

        let key = &after[..end];
        if key.contains("{{") {
            // "{{ {{title}}": only the inner pair is a placeholder.
            out.push_str("{{");
            rest = after;
            continue;
        }

        match expand(key.trim(), title, now) {
            Some(value) => out.push_str(&value),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}

fn expand(key: &str, title: &str, now: &DateTime<Local>) -> Option<String> {
    match key {
        "title" => Some(title.to_string()),
        "date" => Some(now.format("%Y-%m-%d").to_string()),
        "time" => Some(now.format("%H:%M").to_string()),
        _ => key
            .strip_prefix("date:")
            .map(|pattern| format_date(pattern.trim(), now)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, 9, 7, 0).unwrap()
    }

    #[test]
    fn replaces_known_variables() {
        let template =
            "# {{title}}\ncreated {{date}} {{time}}\n{{date:YYYY-MM-DD}} / {{date:MMM DD YYYY}}";
        let rendered = render(template, "2024-03-05", &sample());
        assert_eq!(
            rendered,
            "# 2024-03-05\ncreated 2024-03-05 09:07\n2024-03-05 / Mar 05 2024"
        );
    }

    #[test]
    fn unknown_and_unclosed_placeholders_survive() {
        let now = sample();
        assert_eq!(render("{{weather}} ok", "t", &now), "{{weather}} ok");
        assert_eq!(render("tail {{title", "t", &now), "tail {{title");
        assert_eq!(render("{{ {{title}}", "t", &now), "{{ t");
    }

    #[test]
    fn time_takes_no_pattern() {
        let now = sample();
        assert_eq!(render("{{time:HH:mm}}", "t", &now), "{{time:HH:mm}}");
        assert_eq!(render("{{ time }}", "t", &now), "09:07");
    }
}
