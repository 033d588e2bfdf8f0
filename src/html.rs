use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::builtin;
use crate::confidence::{BAR_ID, TEXT_ID};
use crate::theme::{ThemePreference, TOGGLE_ID};

/// One recognition result, as shown on the result page.
pub struct ResultPage<'a> {
    pub name: &'a str,
    pub confidence: f64,
    /// `src` of the photo, already resolved by the asset store.
    pub image_src: Option<&'a str>,
}

pub fn build_result_html(page: &ResultPage<'_>) -> String {
    let title = format!("Result: {}", page.name);
    let confidence = format_confidence(page.confidence);

    let markup: Markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                style { (PreEscaped(builtin::BUILTIN_CSS)) }
            }
            body {
                header class="rui-topbar" {
                    button type="button" id=(TOGGLE_ID) class="rui-btn" {
                        (ThemePreference::default().label())
                    }
                }
                main class="rui-card" {
                    @if let Some(src) = page.image_src {
                        img class="rui-photo" src=(src) alt=(page.name);
                    }
                    h2 class="rui-name" { (page.name) }
                    (confidence_bar(&confidence))
                }
            }
        }
    };
    markup.into_string()
}

fn confidence_bar(confidence: &str) -> Markup {
    html! {
        div class="rui-confidence" {
            div class="rui-track" {
                div id=(BAR_ID) data-confidence=(confidence) {}
            }
            span id=(TEXT_ID) { (confidence) }
        }
    }
}

/// Two decimals at most, without trailing zeros (`0.87`, `0.5`, `92`).
///
/// `{:.2}` rounds the exact binary value with ties to even, so `0.625` gives
/// `0.62`. Huge values switch to exponent form and infinities are spelled
/// `Infinity` so the bar can still parse them.
fn format_confidence(confidence: f64) -> String {
    if confidence.is_nan() {
        return "NaN".to_string();
    }
    if confidence.is_infinite() {
        let sign = if confidence < 0.0 { "-" } else { "" };
        return format!("{sign}Infinity");
    }
    if confidence.abs() >= 1e16 {
        let exp = format!("{:e}", confidence);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }

    let fixed = format!("{:.2}", confidence);
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confidence::{ConfidenceBand, ConfidenceReading};

    #[test]
    fn confidence_rounded_to_two_places() {
        assert_eq!(format_confidence(0.876), "0.88");
        assert_eq!(format_confidence(0.5), "0.5");
        assert_eq!(format_confidence(92.0), "92");
    }

    #[test]
    fn confidence_ties_round_to_even() {
        assert_eq!(format_confidence(0.125), "0.12");
        assert_eq!(format_confidence(0.625), "0.62");
        assert_eq!(format_confidence(0.375), "0.38");
    }

    #[test]
    fn extreme_confidence_stays_parseable() {
        assert_eq!(format_confidence(1e307), "1e+307");
        assert_eq!(format_confidence(f64::INFINITY), "Infinity");
        for v in [1e307, f64::INFINITY] {
            let reading = ConfidenceReading::parse(&format_confidence(v));
            assert_eq!(reading.text(), "100%");
            assert_eq!(reading.band(), ConfidenceBand::High);
        }
    }

    #[test]
    fn result_page_carries_component_hooks() {
        let html = build_result_html(&ResultPage {
            name: "Ada <Lovelace>",
            confidence: 0.91,
            image_src: Some("assets/img/x.png"),
        });
        assert!(html.contains(r#"id="progress" data-confidence="0.91""#));
        assert!(html.contains(r#"id="confidence-value""#));
        assert!(html.contains(r#"id="theme-toggle""#));
        assert!(html.contains("Ada &lt;Lovelace&gt;"));
        assert!(html.contains(r#"src="assets/img/x.png""#));
    }
}
