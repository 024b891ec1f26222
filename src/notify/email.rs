//! HTML digest email delivery over SMTP.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{debug, info};

use crate::config::SmtpConfig;
use crate::error::NotifyError;
use crate::reconcile::ReconciliationReport;

use super::Notifier;

const SUBJECT: &str = "New Board Game Expansion(s) Available";
const BGG_ITEM_URL: &str = "https://boardgamegeek.com/boardgame";

/// Sends the unowned-expansion digest as an HTML email.
pub struct EmailNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailNotifier {
    /// Creates a notifier from SMTP settings. Fails fast on an unreachable
    /// relay configuration or unparseable addresses.
    pub fn new(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            transport,
            from: parse_mailbox(&config.username)?,
            to: parse_mailbox(&config.to)?,
        })
    }

    /// Renders the digest: one header row per game, one nested row per
    /// unowned expansion, and the total count at the bottom.
    pub fn render_digest(report: &ReconciliationReport) -> String {
        let mut html = String::from(
            "<html>\n<body>\n<h1>New Board Game Expansions Available</h1>\n<ul>\n",
        );

        for entry in &report.games {
            html.push_str(&format!(
                "<li><a href=\"{BGG_ITEM_URL}/{}\">{}</a>\n<ul>\n",
                entry.game.id, entry.game.name
            ));
            for expansion in &entry.expansions {
                html.push_str(&format!(
                    "<li><a href=\"{BGG_ITEM_URL}/{}\">{}</a> ({})</li>\n",
                    expansion.id, expansion.name, expansion.year
                ));
            }
            html.push_str("</ul>\n</li>\n");
        }

        html.push_str(&format!(
            "</ul>\n<p>{} expansion(s) found that you do not own yet.</p>\n</body>\n</html>\n",
            report.unowned_count
        ));

        html
    }
}

#[async_trait]
impl Notifier for EmailNotifier {
    async fn notify(&self, report: &ReconciliationReport) -> Result<(), NotifyError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(SUBJECT)
            .header(ContentType::TEXT_HTML)
            .body(Self::render_digest(report))?;

        let response = self.transport.send(message).await?;
        debug!(code = %response.code(), "SMTP relay accepted digest");
        info!(
            expansions = report.unowned_count,
            "Sent expansion digest email"
        );

        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, NotifyError> {
    address
        .parse::<Mailbox>()
        .map_err(|err| NotifyError::InvalidAddress {
            address: address.to_string(),
            reason: err.to_string(),
        })
}
