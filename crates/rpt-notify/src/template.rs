//! Placeholder substitution for subjects and bodies.
//!
//! | Placeholder           | Value                          |
//! |-----------------------|--------------------------------|
//! | `{{year_month}}`      | `2025_06`                      |
//! | `{{month_year_full}}` | `June 2025`                    |
//! | `{{day_month_year}}`  | `01/06/2025`                   |
//! | `{{report_list}}`     | one `- <file name>` per report |
//!
//! Bodies also replace `[sender_name]` and `[recipients]`.

use rpt_model::ReferencePeriod;

pub const DEFAULT_SUBJECT: &str = "Monthly Sales Report - {{month_year_full}}";

pub const DEFAULT_BODY: &str = "Hello,

Attached are the management reports for {{month_year_full}}:

{{report_list}}

Best regards,

[sender_name]
";

/// Values available to templates.
#[derive(Debug, Clone)]
pub struct TemplateContext<'a> {
    pub period: ReferencePeriod,
    pub attachments: &'a [String],
    pub sender_name: &'a str,
    pub recipients: &'a [String],
}

impl TemplateContext<'_> {
    fn report_list(&self) -> String {
        self.attachments
            .iter()
            .map(|name| format!("- {name}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn substitute_dates(&self, template: &str) -> String {
        let day = self.period.first_day();
        template
            .replace("{{year_month}}", &self.period.suffix())
            .replace(
                "{{month_year_full}}",
                &format!("{} {}", self.period.month_name(), self.period.year()),
            )
            .replace("{{day_month_year}}", &day.format("%d/%m/%Y").to_string())
            .replace("{{report_list}}", &self.report_list())
    }

    pub fn render_subject(&self, template: &str) -> String {
        self.substitute_dates(template)
    }

    pub fn render_body(&self, template: &str) -> String {
        self.substitute_dates(template)
            .replace("[sender_name]", self.sender_name)
            .replace("[recipients]", &self.recipients.join(", "))
    }
}
