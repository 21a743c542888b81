pub mod ana;
pub mod jal;

use log::info;
use reqwest::blocking::Client;
use reqwest::redirect;
use scraper::{ElementRef, Selector};

use crate::config::Config;
use crate::error::{FetchError, ParseError};
use crate::model::FlightInfo;

pub use ana::Ana;
pub use jal::Jal;

/// What a source's parser extracts from one page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub has_irregularity: bool,
    pub flight_infos: Vec<FlightInfo>,
    /// The page's own "last updated" stamp, passed through to the message
    /// verbatim. Never inspected by the policy.
    pub update_time: String,
}

/// One airline's page: where it lives, how to read it, and the copy its
/// notifications carry. The rest of the pipeline is shared.
pub trait AirlineSource {
    fn source_key(&self) -> &'static str;
    fn url(&self) -> &'static str;
    /// Message headline, e.g. "ANA irregular flight operations".
    fn title(&self) -> &'static str;
    fn parse(&self, html: &str) -> Result<Parsed, ParseError>;
}

pub fn build_client(config: &Config) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(&config.user_agent)
        .redirect(redirect::Policy::none())
        .build()
}

pub fn fetch(client: &Client, source: &dyn AirlineSource) -> Result<String, FetchError> {
    let url = source.url();
    info!("fetching {url}");
    let res = client.get(url).send().map_err(|e| FetchError::Request {
        url: url.into(),
        source: e,
    })?;
    if !res.status().is_success() {
        return Err(FetchError::Status {
            url: url.into(),
            status: res.status(),
        });
    }
    res.text().map_err(|e| FetchError::Request {
        url: url.into(),
        source: e,
    })
}

pub(crate) fn select_one<'a>(
    element: &'a ElementRef,
    selector: &'static str,
) -> Result<ElementRef<'a>, ParseError> {
    element
        .select(&Selector::parse(selector).unwrap())
        .next()
        .ok_or(ParseError::MissingElement(selector))
}

pub(crate) fn text_of(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
