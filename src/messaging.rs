//! Outreach messaging

use std::borrow::Cow;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::{Url, form_urlencoded};

use crate::{errors::ErrorKind, loyalty::CustomerProfile};

/// Default deep-link base, a WhatsApp click-to-chat link.
pub const DEFAULT_DEEP_LINK_BASE: &str = "https://wa.me/";

/// Errors raised while composing an outreach link.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessagingError {
    /// The deep-link base is not a URL that can carry a contact path.
    #[error("invalid deep link base: {0}")]
    InvalidDeepLinkBase(String),

    /// The customer contact is blank.
    #[error("customer contact is empty")]
    EmptyContact,
}

impl MessagingError {
    /// Flat error kind.
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidDeepLink
    }
}

/// Which canned outreach message a customer should receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageTemplate {
    /// Win-back message for a lapsed customer
    ReEngagement,

    /// The customer has earned a free wash
    FreeWashEarned,

    /// Progress reminder towards the next free wash
    Standard {
        /// Paid full washes still needed
        remaining: usize,
    },
}

/// Picks the outreach template for a customer.
///
/// A lapsed customer always gets the re-engagement message, even when their
/// wash count has just completed a cycle.
pub fn select(profile: &CustomerProfile) -> MessageTemplate {
    if profile.is_lapsed() {
        MessageTemplate::ReEngagement
    } else if profile.has_earned_free_wash() {
        MessageTemplate::FreeWashEarned
    } else {
        MessageTemplate::Standard {
            remaining: profile.remaining_for_free_wash(),
        }
    }
}

/// Message texts with `{count}` and `{location}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessageTemplates {
    /// Text for [`MessageTemplate::ReEngagement`]
    pub re_engagement: String,

    /// Text for [`MessageTemplate::FreeWashEarned`]
    pub free_wash: String,

    /// Text for [`MessageTemplate::Standard`]
    pub standard: String,

    /// Text sent to a selection of customers at once
    pub bulk: String,

    /// Link to the car wash location
    pub location: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            re_engagement: "We miss you! It has been a while since your last wash. \
                            Come back and see us: {location}"
                .to_string(),
            free_wash: "Congratulations! Your next full wash is on us. \
                        Find us here: {location}"
                .to_string(),
            standard: "Thank you for your visit! Only {count} more full washes until \
                       your free wash. Find us here: {location}"
                .to_string(),
            bulk: "Hello from the car wash! We have new offers waiting for you.".to_string(),
            location: "https://share.google/UB0m98HiDNbftnJAc".to_string(),
        }
    }
}

impl MessageTemplates {
    /// Renders a template, substituting every placeholder.
    pub fn render(&self, template: MessageTemplate) -> String {
        let (text, count) = match template {
            MessageTemplate::ReEngagement => (&self.re_engagement, None),
            MessageTemplate::FreeWashEarned => (&self.free_wash, None),
            MessageTemplate::Standard { remaining } => (&self.standard, Some(remaining)),
        };

        let rendered = text.replace("{location}", &self.location);

        match count {
            Some(count) => rendered.replace("{count}", &count.to_string()),
            None => rendered,
        }
    }

    /// Renders the bulk message.
    pub fn render_bulk(&self) -> String {
        self.bulk.replace("{location}", &self.location)
    }
}

/// Builder of `base/<contact>?text=<message>` links.
///
/// The message is percent-encoded with spaces as `%20`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeepLink {
    base: Cow<'static, str>,
}

impl Default for DeepLink {
    fn default() -> Self {
        Self {
            base: Cow::Borrowed(DEFAULT_DEEP_LINK_BASE),
        }
    }
}

impl DeepLink {
    /// Creates a link builder over a custom base.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::InvalidDeepLinkBase`] if `base` is not a URL
    /// with a path (e.g. `mailto:` or a bare string).
    pub fn new(base: &str) -> Result<Self, MessagingError> {
        let deep_link = Self {
            base: Cow::Owned(base.to_string()),
        };

        deep_link.base_url()?;

        Ok(deep_link)
    }

    /// Link that opens a chat with one contact, pre-filled with `message`.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::EmptyContact`] if `contact` is blank.
    pub fn for_contact(&self, contact: &str, message: &str) -> Result<Url, MessagingError> {
        let contact = contact.trim();

        if contact.is_empty() {
            return Err(MessagingError::EmptyContact);
        }

        let mut url = self.base_url()?;

        url.path_segments_mut()
            .map_err(|()| MessagingError::InvalidDeepLinkBase(self.base.to_string()))?
            .pop_if_empty()
            .push(contact);

        Ok(with_text(url, message))
    }

    /// Link with a pre-filled message and no contact, so the sender picks
    /// the recipients.
    ///
    /// # Errors
    ///
    /// Returns [`MessagingError::InvalidDeepLinkBase`] if the base does not parse.
    pub fn bulk(&self, message: &str) -> Result<Url, MessagingError> {
        Ok(with_text(self.base_url()?, message))
    }

    fn base_url(&self) -> Result<Url, MessagingError> {
        let url = Url::parse(&self.base)
            .map_err(|err| MessagingError::InvalidDeepLinkBase(err.to_string()))?;

        if url.cannot_be_a_base() {
            return Err(MessagingError::InvalidDeepLinkBase(self.base.to_string()));
        }

        Ok(url)
    }
}

fn with_text(mut url: Url, message: &str) -> Url {
    let text = form_urlencoded::byte_serialize(message.as_bytes())
        .collect::<String>()
        .replace('+', "%20");

    url.set_query(Some(&format!("text={text}")));
    url
}

/// A selected, rendered and addressed outreach message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outreach {
    /// The selected template
    pub template: MessageTemplate,

    /// The rendered message text
    pub message: String,

    /// Link that opens the chat with the message pre-filled
    pub link: Url,
}

/// Selects, renders and addresses the outreach message for a customer.
///
/// # Errors
///
/// Returns [`MessagingError::EmptyContact`] if the profile has a blank contact.
pub fn compose(
    profile: &CustomerProfile,
    templates: &MessageTemplates,
    deep_link: &DeepLink,
) -> Result<Outreach, MessagingError> {
    let template = select(profile);
    let message = templates.render(template);
    let link = deep_link.for_contact(&profile.contact, &message)?;

    debug!(contact = %profile.contact, ?template, "outreach composed");

    Ok(Outreach {
        template,
        message,
        link,
    })
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn profile(count: usize, days: Option<i64>) -> CustomerProfile {
        CustomerProfile {
            contact: "966500000000".to_string(),
            records: Vec::new(),
            paid_full_wash_count: count,
            days_since_last_visit: days,
        }
    }

    #[test]
    fn lapsed_customer_gets_re_engagement() {
        assert_eq!(select(&profile(3, Some(31))), MessageTemplate::ReEngagement);
    }

    #[test]
    fn re_engagement_beats_free_wash() {
        assert_eq!(select(&profile(6, Some(45))), MessageTemplate::ReEngagement);
    }

    #[test]
    fn completed_cycle_gets_free_wash() {
        assert_eq!(select(&profile(6, Some(5))), MessageTemplate::FreeWashEarned);
        assert_eq!(select(&profile(12, Some(30))), MessageTemplate::FreeWashEarned);
    }

    #[test]
    fn otherwise_standard_with_remaining_count() {
        assert_eq!(
            select(&profile(0, Some(1))),
            MessageTemplate::Standard { remaining: 6 }
        );
        assert_eq!(
            select(&profile(7, None)),
            MessageTemplate::Standard { remaining: 5 }
        );
    }

    #[test]
    fn selection_is_total() {
        for count in 0..20 {
            for days in [None, Some(-1), Some(0), Some(30), Some(31), Some(400)] {
                let template = select(&profile(count, days));

                let matches_one = [
                    template == MessageTemplate::ReEngagement,
                    template == MessageTemplate::FreeWashEarned,
                    matches!(
                        template,
                        MessageTemplate::Standard { remaining } if (1..=6).contains(&remaining)
                    ),
                ]
                .into_iter()
                .filter(|hit| *hit)
                .count();

                assert_eq!(matches_one, 1, "count {count}, days {days:?}");
            }
        }
    }

    #[test]
    fn render_substitutes_every_placeholder() {
        let templates = MessageTemplates {
            standard: "{count} left, {count}! {location}".to_string(),
            location: "https://example.test/map".to_string(),
            ..MessageTemplates::default()
        };

        let message = templates.render(MessageTemplate::Standard { remaining: 2 });

        assert_eq!(message, "2 left, 2! https://example.test/map");
    }

    #[test]
    fn render_free_wash_includes_location() {
        let templates = MessageTemplates::default();

        let message = templates.render(MessageTemplate::FreeWashEarned);

        assert!(message.contains(&templates.location));
        assert!(!message.contains("{location}"));
    }

    #[test]
    fn contact_link_encodes_message() -> TestResult {
        let link = DeepLink::default().for_contact("966500000000", "hi & bye")?;

        assert_eq!(link.as_str(), "https://wa.me/966500000000?text=hi%20%26%20bye");

        Ok(())
    }

    #[test]
    fn spaces_are_percent_encoded() -> TestResult {
        let link = DeepLink::default().for_contact("966500000000", "Only 4 more")?;

        assert_eq!(
            link.as_str(),
            "https://wa.me/966500000000?text=Only%204%20more"
        );
        assert_eq!(
            link.query_pairs().next().map(|(_, v)| v.into_owned()),
            Some("Only 4 more".to_string())
        );

        Ok(())
    }

    #[test]
    fn custom_base_keeps_its_path() -> TestResult {
        let link = DeepLink::new("https://chat.example.test/send/")?.for_contact(" 42 ", "x")?;

        assert_eq!(link.as_str(), "https://chat.example.test/send/42?text=x");

        Ok(())
    }

    #[test]
    fn blank_contact_is_rejected() {
        let result = DeepLink::default().for_contact("  ", "hello");

        assert_eq!(result, Err(MessagingError::EmptyContact));
    }

    #[test]
    fn non_hierarchical_base_is_rejected() {
        assert!(matches!(
            DeepLink::new("mailto:someone@example.test"),
            Err(MessagingError::InvalidDeepLinkBase(_))
        ));
        assert!(matches!(
            DeepLink::new("not a url"),
            Err(MessagingError::InvalidDeepLinkBase(_))
        ));
    }

    #[test]
    fn bulk_link_has_no_contact() -> TestResult {
        let link = DeepLink::default().bulk("new offers")?;

        assert_eq!(link.as_str(), "https://wa.me/?text=new%20offers");

        Ok(())
    }

    #[test]
    fn default_base_parses() -> TestResult {
        assert_eq!(DeepLink::new(DEFAULT_DEEP_LINK_BASE)?, DeepLink::default());

        Ok(())
    }

    #[test]
    fn compose_addresses_the_profile_contact() -> TestResult {
        let outreach = compose(
            &profile(6, Some(2)),
            &MessageTemplates::default(),
            &DeepLink::default(),
        )?;

        assert_eq!(outreach.template, MessageTemplate::FreeWashEarned);
        assert!(outreach.link.as_str().starts_with("https://wa.me/966500000000?text="));
        assert_eq!(
            outreach.link.query_pairs().next().map(|(_, v)| v.into_owned()),
            Some(outreach.message)
        );

        Ok(())
    }
}
