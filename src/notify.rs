use log::info;
use reqwest::blocking::Client;
use serde::Serialize;
use slack_morphism::prelude::*;

use crate::config::Config;
use crate::error::NotifyError;
use crate::model::FlightInfo;
use crate::policy::{Action, Decision};
use crate::source::AirlineSource;

const EMOJI_AIRPLANE: &str = ":airplane:";
const EMOJI_OK: &str = ":white_check_mark:";

/// Presentation knobs from the CLI; the webhook URL itself comes from
/// [`Config`].
pub struct MessageOptions<'a> {
    pub username: &'a str,
    pub icon_emoji: &'a str,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    username: &'a str,
    icon_emoji: &'a str,
    #[serde(flatten)]
    content: SlackMessageContent,
}

fn render_airport_lines(info: &FlightInfo) -> String {
    let lines: Vec<String> = info
        .airports
        .iter()
        .map(|airport| {
            let details = airport
                .attributes
                .iter()
                .map(|(key, value)| format!("{key}: {value}"))
                .collect::<Vec<_>>()
                .join(", ");
            if details.is_empty() {
                format!("• *{}*", airport.name)
            } else {
                format!("• *{}* ({details})", airport.name)
            }
        })
        .collect();
    format!("*{}*\n{}", info.region, lines.join("\n"))
}

fn render_irregular(source: &dyn AirlineSource, decision: &Decision) -> Vec<SlackBlock> {
    let mut blocks: Vec<SlackBlock> = vec![
        SlackHeaderBlock::new(pt!(format!("{EMOJI_AIRPLANE} {}", source.title()))).into(),
    ];
    for info in &decision.flight_infos {
        blocks.push(
            SlackSectionBlock::new()
                .with_text(md!(render_airport_lines(info)))
                .into(),
        );
    }
    blocks
}

fn render_normal(source: &dyn AirlineSource) -> Vec<SlackBlock> {
    vec![
        SlackHeaderBlock::new(pt!(format!("{EMOJI_OK} {}", source.title()))).into(),
        SlackSectionBlock::new()
            .with_text(md!("Flights are back to normal operation."))
            .into(),
    ]
}

/// Builds the Slack message content for a notifying decision. Pure; the
/// webhook POST lives in [`send`].
pub fn build_message(
    source: &dyn AirlineSource,
    decision: &Decision,
    update_time: &str,
) -> SlackMessageContent {
    let mut blocks = match decision.action {
        Action::NotifyIrregular => render_irregular(source, decision),
        _ => render_normal(source),
    };

    blocks.push(
        SlackContextBlock::new(vec![SlackContextBlockElement::MarkDown(md!(format!(
            "Source update: {update_time}"
        )))])
        .into(),
    );
    if decision.with_mention {
        blocks.push(
            SlackContextBlock::new(vec![SlackContextBlockElement::MarkDown(md!("<!channel>"))])
                .into(),
        );
    }

    let fallback = match decision.action {
        Action::NotifyIrregular => format!(
            "{}: {} region(s) affected",
            source.title(),
            decision.flight_infos.len()
        ),
        _ => format!("{}: back to normal operation", source.title()),
    };

    SlackMessageContent::new()
        .with_text(fallback)
        .with_blocks(blocks)
}

/// Posts the message to the incoming webhook. Called before any state is
/// persisted, so a failed delivery leaves the prior baseline in place and the
/// next run re-notifies.
pub fn send(
    client: &Client,
    config: &Config,
    source: &dyn AirlineSource,
    decision: &Decision,
    update_time: &str,
    options: &MessageOptions,
) -> Result<(), NotifyError> {
    debug_assert!(decision.action != Action::Suppress);

    let content = build_message(source, decision, update_time);
    let payload = WebhookPayload {
        username: options.username,
        icon_emoji: options.icon_emoji,
        content,
    };

    client
        .post(&config.slack_webhook_url)
        .json(&payload)
        .send()?
        .error_for_status()?;

    info!("{}: {} message delivered", source.source_key(), decision.action);
    Ok(())
}
