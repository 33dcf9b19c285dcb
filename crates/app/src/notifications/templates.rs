//! Email templates.

/// Subject and HTML body of a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub subject: String,
    pub html: String,
}

/// Escape text interpolated into HTML bodies.
#[must_use]
pub fn escape(value: &str) -> String {
    html_escape::encode_safe(value).into_owned()
}

fn layout(heading: &str, paragraphs: &[String], action: Option<(&str, &str)>) -> String {
    let mut html = String::from(
        "<div style=\"font-family:Arial,sans-serif;max-width:600px;margin:0 auto\">",
    );

    html.push_str(&format!("<h2>{}</h2>", escape(heading)));

    for paragraph in paragraphs {
        html.push_str(&format!("<p>{paragraph}</p>"));
    }

    if let Some((label, href)) = action {
        html.push_str(&format!(
            "<p><a href=\"{}\" style=\"display:inline-block;padding:10px 20px;\
             background:#0057b8;color:#fff;text-decoration:none;border-radius:4px\">{}</a></p>",
            html_escape::encode_double_quoted_attribute(href),
            escape(label)
        ));
    }

    html.push_str("</div>");
    html
}

#[must_use]
pub fn invite(link_root: &str, token: &str, role: &str) -> Rendered {
    let link = format!("{link_root}/register?token={token}");

    Rendered {
        subject: "You're invited to the Partner Rewards programme".to_string(),
        html: layout(
            "Welcome to Partner Rewards",
            &[
                format!(
                    "You have been invited to join the programme as <strong>{}</strong>.",
                    escape(role)
                ),
                "Use the link below to choose a username and password. \
                 The invitation expires in 7 days."
                    .to_string(),
            ],
            Some(("Accept invitation", &link)),
        ),
    }
}

#[must_use]
pub fn account_approved(name: &str, link_root: &str) -> Rendered {
    let link = format!("{link_root}/login");

    Rendered {
        subject: "Your Partner Rewards account is approved".to_string(),
        html: layout(
            "Account approved",
            &[
                format!("Hi {},", escape(name)),
                "Your account has been approved. You can now log in, register deals \
                 and redeem rewards."
                    .to_string(),
            ],
            Some(("Log in", &link)),
        ),
    }
}

#[must_use]
pub fn account_rejected(name: &str) -> Rendered {
    Rendered {
        subject: "Your Partner Rewards registration".to_string(),
        html: layout(
            "Registration not approved",
            &[
                format!("Hi {},", escape(name)),
                "Unfortunately your registration was not approved. Please contact \
                 your programme administrator if you think this is a mistake."
                    .to_string(),
            ],
            None,
        ),
    }
}

#[must_use]
pub fn password_reset(name: &str, link_root: &str, token: &str) -> Rendered {
    let link = format!("{link_root}/reset-password?token={token}");

    Rendered {
        subject: "Reset your Partner Rewards password".to_string(),
        html: layout(
            "Password reset",
            &[
                format!("Hi {},", escape(name)),
                "We received a request to reset your password. The link below is valid \
                 for one hour. If you did not ask for this you can ignore this email."
                    .to_string(),
            ],
            Some(("Reset password", &link)),
        ),
    }
}

#[must_use]
pub fn deal_approved(name: &str, customer: &str, points: u64) -> Rendered {
    Rendered {
        subject: format!("Deal approved: {customer}"),
        html: layout(
            "Deal approved",
            &[
                format!("Hi {},", escape(name)),
                format!(
                    "Your deal with <strong>{}</strong> was approved and earned you \
                     <strong>{points}</strong> points.",
                    escape(customer)
                ),
            ],
            None,
        ),
    }
}

#[must_use]
pub fn deal_rejected(name: &str, customer: &str, reason: Option<&str>) -> Rendered {
    let mut paragraphs = vec![
        format!("Hi {},", escape(name)),
        format!(
            "Your deal with <strong>{}</strong> was not approved.",
            escape(customer)
        ),
    ];

    if let Some(reason) = reason.filter(|reason| !reason.trim().is_empty()) {
        paragraphs.push(format!("Reason: {}", escape(reason)));
    }

    Rendered {
        subject: format!("Deal not approved: {customer}"),
        html: layout("Deal not approved", &paragraphs, None),
    }
}

#[must_use]
pub fn redemption_status(
    name: &str,
    reward: &str,
    status: &str,
    tracking_number: Option<&str>,
) -> Rendered {
    let mut paragraphs = vec![
        format!("Hi {},", escape(name)),
        format!(
            "Your redemption of <strong>{}</strong> is now <strong>{}</strong>.",
            escape(reward),
            escape(status)
        ),
    ];

    if let Some(tracking) = tracking_number {
        paragraphs.push(format!("Tracking number: {}", escape(tracking)));
    }

    Rendered {
        subject: format!("Reward update: {reward}"),
        html: layout("Reward update", &paragraphs, None),
    }
}

#[must_use]
pub fn ticket_received(name: &str, subject: &str, reference: &str) -> Rendered {
    Rendered {
        subject: format!("We received your request: {subject}"),
        html: layout(
            "Support request received",
            &[
                format!("Hi {},", escape(name)),
                format!(
                    "Thanks for getting in touch about <strong>{}</strong>. Our team will \
                     reply soon. Your reference is {}.",
                    escape(subject),
                    escape(reference)
                ),
            ],
            None,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_neutralises_markup() {
        assert_eq!(
            escape("<b>\"x\" & 'y'</b>"),
            "&lt;b&gt;&quot;x&quot; &amp; &#x27;y&#x27;&lt;&#x2F;b&gt;"
        );
    }

    #[test]
    fn invite_links_to_registration() {
        let rendered = invite("https://rewards.example.com", "abc123", "user");

        assert!(
            rendered
                .html
                .contains("https://rewards.example.com/register?token=abc123"),
            "invite should link to registration: {}",
            rendered.html
        );
    }

    #[test]
    fn deal_rejected_includes_reason_when_present() {
        let with_reason = deal_rejected("Pat", "Acme", Some("duplicate"));
        let without = deal_rejected("Pat", "Acme", Some("  "));

        assert!(with_reason.html.contains("Reason: duplicate"));
        assert!(!without.html.contains("Reason:"));
    }

    #[test]
    fn user_supplied_values_are_escaped() {
        let rendered = deal_approved("<b>Pat</b>", "Acme & Co", 12);

        assert!(rendered.html.contains("&lt;b&gt;Pat&lt;&#x2F;b&gt;"));
        assert!(rendered.html.contains("Acme &amp; Co"));
        assert!(rendered.html.contains("<strong>12</strong>"));
    }
}
