//! HTML templates for RSVP confirmation and diagnostic emails.

use html_escape::{encode_double_quoted_attribute, encode_text};

use domain::models::GuestCount;

use crate::config::EmailConfig;

const STYLE: &str = r#"
        body {
            font-family: 'Georgia', serif;
            background-color: #FAF7F2;
            color: #2C3333;
            margin: 0;
            padding: 0;
        }
        .container {
            max-width: 600px;
            margin: 0 auto;
            background: white;
            border-radius: 12px;
            overflow: hidden;
            box-shadow: 0 4px 20px rgba(0,0,0,0.1);
        }
        .header {
            background: linear-gradient(135deg, #9BA888, #C89F87);
            padding: 40px 20px;
            text-align: center;
            color: white;
        }
        .header h1 {
            margin: 0;
            font-size: 32px;
            font-weight: 300;
            letter-spacing: 2px;
        }
        .content {
            padding: 40px 30px;
        }
        .content h2 {
            color: #9BA888;
            font-size: 24px;
            margin-bottom: 20px;
        }
        .content p {
            line-height: 1.8;
            margin-bottom: 15px;
            font-size: 16px;
        }
        .details {
            background: #FAF7F2;
            padding: 20px;
            border-radius: 8px;
            margin: 25px 0;
        }
        .details p {
            margin: 8px 0;
        }
        .footer {
            background: #2C3333;
            color: #FAF7F2;
            padding: 30px;
            text-align: center;
            font-size: 14px;
        }
        .divider {
            height: 2px;
            background: linear-gradient(90deg, transparent, #C89F87, transparent);
            margin: 30px 0;
        }
"#;

/// Subject line for a confirmation email.
pub fn confirmation_subject(config: &EmailConfig, attending: bool) -> String {
    if attending {
        format!("✓ RSVP Confirmed - {}'s Wedding", config.couple_names)
    } else {
        format!("RSVP Received - {}'s Wedding", config.couple_names)
    }
}

/// HTML body for a confirmation email.
pub fn confirmation_html(
    config: &EmailConfig,
    name: &str,
    attending: bool,
    guests: GuestCount,
) -> String {
    let heading = if attending {
        "We Can't Wait to See You!"
    } else {
        "Thank You for Your Response"
    };

    let response_section = if attending {
        format!(
            r#"<p>Thank you for confirming your attendance at our wedding! We're absolutely thrilled that you'll be celebrating with us on our special day.</p>
                <div class="details">
                    <p><strong>Your RSVP Details:</strong></p>
                    <p>Number of Guests: {total} ({breakdown})</p>
                </div>
                <p>We'll send you more details about the venue, timing, and other important information as the date approaches.</p>"#,
            total = guests.total(),
            breakdown = guests.describe(),
        )
    } else {
        "<p>Thank you for letting us know. We're sorry you won't be able to join us, but we completely understand. You'll be in our thoughts on the day!</p>".to_string()
    };

    let content = format!(
        r#"<h2>{heading}</h2>
                <p>Dear {name},</p>
                {response_section}
                <div class="divider"></div>
                <p>If you need to make any changes to your RSVP, please don't hesitate to contact us at <a href="mailto:{contact_href}" style="color: #9BA888;">{contact}</a></p>
                <p style="margin-top: 30px;">With love and gratitude,<br><strong>{couple}</strong></p>"#,
        name = encode_text(name),
        contact_href = encode_double_quoted_attribute(&config.contact_email),
        contact = encode_text(&config.contact_email),
        couple = encode_text(&config.couple_names),
    );

    layout(config, &content)
}

/// Subject line for the diagnostic test email.
pub fn test_email_subject(config: &EmailConfig) -> String {
    format!("Test Email - {}'s Wedding RSVP", config.couple_names)
}

/// HTML body for the diagnostic test email.
pub fn test_email_html(config: &EmailConfig) -> String {
    let content = format!(
        r#"<h2>Email Configuration Working</h2>
                <p>If you're reading this, the RSVP server can send confirmation emails from <strong>{from}</strong>.</p>
                <p>Sent at {sent_at}.</p>"#,
        from = encode_text(config.from_address()),
        sent_at = chrono::Utc::now().to_rfc3339(),
    );

    layout(config, &content)
}

fn layout(config: &EmailConfig, content: &str) -> String {
    let couple = encode_text(&config.couple_names);
    let date = encode_text(&config.wedding_date);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>{style}</style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>{couple}</h1>
            <p style="margin: 10px 0 0 0; letter-spacing: 3px; font-size: 14px;">{date_upper}</p>
        </div>
        <div class="content">
                {content}
        </div>
        <div class="footer">
            <p>{couple}'s Wedding</p>
            <p>{date}</p>
        </div>
    </div>
</body>
</html>"#,
        style = STYLE,
        date_upper = encode_text(&config.wedding_date.to_uppercase()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig::default()
    }

    #[test]
    fn test_attending_subject() {
        assert_eq!(
            confirmation_subject(&config(), true),
            "✓ RSVP Confirmed - Sarah & Michael's Wedding"
        );
        assert_eq!(
            confirmation_subject(&config(), false),
            "RSVP Received - Sarah & Michael's Wedding"
        );
    }

    #[test]
    fn test_attending_body_shows_guest_count() {
        let html = confirmation_html(
            &config(),
            "Ada",
            true,
            GuestCount::from_inputs(Some(2), Some(1)),
        );
        assert!(html.contains("We Can't Wait to See You!"));
        assert!(html.contains("Dear Ada,"));
        assert!(html.contains("Number of Guests: 3 (2 adults, 1 child)"));
        assert!(html.contains("JUNE 15, 2026"));
    }

    #[test]
    fn test_attending_body_without_children() {
        let html = confirmation_html(&config(), "Ada", true, GuestCount::from_inputs(None, None));
        assert!(html.contains("Number of Guests: 1 (1 adult)"));
    }

    #[test]
    fn test_declined_body_is_acknowledgment() {
        let html = confirmation_html(
            &config(),
            "Ada",
            false,
            GuestCount::from_inputs(Some(3), None),
        );
        assert!(html.contains("Thank You for Your Response"));
        assert!(html.contains("sorry you won't be able to join us"));
        assert!(!html.contains("Number of Guests"));
    }

    #[test]
    fn test_guest_name_is_escaped() {
        let html = confirmation_html(
            &config(),
            "<script>alert(1)</script>",
            false,
            GuestCount::from_inputs(None, None),
        );
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_contact_email_in_footer() {
        let html = confirmation_html(&config(), "Ada", true, GuestCount::from_inputs(None, None));
        assert!(html.contains("mailto:wedding@sarahandmichael.com"));
        assert!(html.contains("Sarah &amp; Michael"));
    }

    #[test]
    fn test_contact_address_is_escaped_in_link() {
        let mut config = config();
        config.contact_email = "a\"b@example.com".to_string();
        let html = confirmation_html(&config, "Ada", false, GuestCount::from_inputs(None, None));
        assert!(html.contains("mailto:a&quot;b@example.com"));
        assert!(!html.contains("mailto:a\"b"));
    }

    #[test]
    fn test_test_email_mentions_sender() {
        let mut config = config();
        config.smtp_username = "couple@example.com".to_string();
        assert!(test_email_html(&config).contains("couple@example.com"));
        assert!(test_email_subject(&config).contains("Sarah & Michael"));
    }
}
