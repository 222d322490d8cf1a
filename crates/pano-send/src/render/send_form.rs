//! The post submission form.

use maud::{Markup, PreEscaped, html};
use pano_core::{FormState, SubmissionInput};

use super::components::{SEND_JS, page_shell};
use crate::config::Config;

/// Submit button label when idle.
pub const SUBMIT_LABEL: &str = "Gönder";
/// Submit button label while a submission is in flight.
pub const SUBMITTING_LABEL: &str = "Gönderiliyor...";
/// Shown when the metadata endpoint cannot be reached from the browser.
pub const META_FAILED_MESSAGE: &str = "Bağlantı bilgileri alınamadı.";
/// Shown when the submission request itself fails in the browser.
pub const SUBMIT_FAILED_MESSAGE: &str = "Gönderi iletilemedi. Lütfen tekrar deneyin.";

/// Values the form fields start with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormValues<'a> {
    pub url: &'a str,
    pub title: &'a str,
    pub content: &'a str,
}

impl<'a> FormValues<'a> {
    /// Pre-fill title and content from the metadata in `form`.
    pub fn prefilled(url: &'a str, form: &'a FormState) -> Self {
        let meta = form.meta.as_ref();
        Self {
            url,
            title: meta.map(|m| m.title_or_empty()).unwrap_or_default(),
            content: meta.map(|m| m.description_or_empty()).unwrap_or_default(),
        }
    }

    /// Echo back what the user submitted.
    pub fn submitted(input: &'a SubmissionInput) -> Self {
        Self {
            url: input.url.as_deref().unwrap_or_default(),
            title: input.title.as_deref().unwrap_or_default(),
            content: input.content.as_deref().unwrap_or_default(),
        }
    }
}

/// Render the complete send page.
pub fn render(values: &FormValues<'_>, form: &FormState, config: &Config) -> Markup {
    let body = html! {
        h1 class="page-title" { "Yeni gönderi" }
        (send_form(values, form, config))
        script { (PreEscaped(SEND_JS)) }
    };

    page_shell(
        "Gönder",
        "Bir bağlantı ya da yazı paylaşın.",
        body,
        &config.site_name,
    )
}

/// The `<form>` element alone.
pub fn send_form(values: &FormValues<'_>, form: &FormState, config: &Config) -> Markup {
    let label = if form.submitting {
        SUBMITTING_LABEL
    } else {
        SUBMIT_LABEL
    };
    let submitting = if form.submitting { "true" } else { "false" };

    html! {
        form id="send-form" class="send-form" method="post" action="/send"
            data-meta-endpoint=(config.meta_endpoint)
            data-debounce-ms=(config.debounce.as_millis())
            data-idle-label=(SUBMIT_LABEL)
            data-busy-label=(SUBMITTING_LABEL)
            data-meta-failed=(META_FAILED_MESSAGE)
            data-submit-failed=(SUBMIT_FAILED_MESSAGE)
        {
            div class="field" {
                label for="url" { "URL" }
                input id="url" name="url" type="text" inputmode="url"
                    autocomplete="off" value=(values.url);
            }
            div class="field" {
                label for="title" { "Başlık" }
                input id="title" name="title" type="text" value=(values.title);
            }
            div class="field" {
                label for="content" { "İçerik" }
                textarea id="content" name="content" { (values.content) }
            }
            p id="send-error" class="validation-message" role="alert"
                data-submitting=(submitting) hidden[form.error.is_none()]
            {
                @if let Some(error) = &form.error {
                    (error)
                }
            }
            button id="send-submit" class="send-submit" type="submit" disabled[form.submitting] {
                (label)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pano_core::Meta;

    fn render_form(values: &FormValues<'_>, form: &FormState) -> String {
        send_form(values, form, &Config::default()).into_string()
    }

    #[test]
    fn renders_fields_with_labels() {
        let html = render_form(&FormValues::default(), &FormState::default());
        assert!(html.contains(r#"name="url""#));
        assert!(html.contains(r#"name="title""#));
        assert!(html.contains(r#"name="content""#));
        assert!(html.contains(">URL</label>"));
        assert!(html.contains(">Başlık</label>"));
        assert!(html.contains(">İçerik</label>"));
    }

    #[test]
    fn idle_form_shows_submit_label_and_hides_error() {
        let html = render_form(&FormValues::default(), &FormState::default());
        assert!(html.contains(">Gönder</button>"));
        assert!(html.contains(r#"data-submitting="false""#));
        assert!(html.contains(" hidden"));
    }

    #[test]
    fn submitting_form_shows_busy_label() {
        let form = FormState {
            submitting: true,
            ..FormState::default()
        };
        let html = render_form(&FormValues::default(), &form);
        assert!(html.contains(">Gönderiliyor...</button>"));
        assert!(html.contains(r#"data-submitting="true""#));
    }

    #[test]
    fn error_is_rendered_as_alert() {
        let form = FormState {
            error: Some("Başlık en az iki harfli olmalıdır.".to_string()),
            ..FormState::default()
        };
        let html = render_form(&FormValues::default(), &form);
        assert!(html.contains(r#"role="alert""#));
        assert!(html.contains("Başlık en az iki harfli olmalıdır."));
        assert!(!html.contains(" hidden"));
    }

    #[test]
    fn meta_prefills_title_and_content() {
        let form = FormState {
            meta: Some(Meta {
                title: Some("Kampüs".to_string()),
                description: Some("Topluluk <3".to_string()),
            }),
            ..FormState::default()
        };
        let values = FormValues::prefilled("https://kamp.us", &form);
        let html = render_form(&values, &form);
        assert!(html.contains(r#"value="https://kamp.us""#));
        assert!(html.contains(r#"value="Kampüs""#));
        assert!(html.contains("Topluluk &lt;3</textarea>"));
    }

    #[test]
    fn submitted_values_are_echoed() {
        let input = SubmissionInput {
            title: Some("H".to_string()),
            content: Some("merhaba".to_string()),
            url: None,
        };
        let values = FormValues::submitted(&input);
        assert_eq!(values.title, "H");
        assert_eq!(values.content, "merhaba");
        assert_eq!(values.url, "");
    }

    #[test]
    fn form_carries_script_configuration() {
        let html = render_form(&FormValues::default(), &FormState::default());
        assert!(html.contains(r#"data-meta-endpoint="/api/parse-meta""#));
        assert!(html.contains(r#"data-debounce-ms="1500""#));
    }

    #[test]
    fn full_page_includes_script() {
        let html = render(&FormValues::default(), &FormState::default(), &Config::default())
            .into_string();
        assert!(html.contains("<script>"));
        assert!(html.contains("clearTimeout(pending)"));
        assert!(html.contains("Gönder · Pano"));
    }
}
