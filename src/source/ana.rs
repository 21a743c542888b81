use scraper::{Html, Selector};

use super::{AirlineSource, Parsed, select_one, text_of};
use crate::error::ParseError;
use crate::model::{AirportEntry, FlightInfo};

/// ANA's domestic flight status page. Each affected region is a
/// `section.region-block` with a heading and a table of airports, one
/// `td.period` per airport giving the applicable period. When nothing is
/// affected the page shows a `p.normal-operation` notice instead.
pub struct Ana;

impl AirlineSource for Ana {
    fn source_key(&self) -> &'static str {
        "ana"
    }

    fn url(&self) -> &'static str {
        "https://www.ana.co.jp/fs/dom/jp/irregular_info.html"
    }

    fn title(&self) -> &'static str {
        "ANA irregular flight operations"
    }

    fn parse(&self, html: &str) -> Result<Parsed, ParseError> {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let area = select_one(&root, "div#flightInfoArea")?;
        let update_time = text_of(&select_one(&area, "p.update-time")?);

        let mut flight_infos = Vec::new();
        for block in area.select(&Selector::parse("section.region-block").unwrap()) {
            let region = text_of(&select_one(&block, "h3.region-name")?);
            let mut airports = Vec::new();
            for row in block.select(&Selector::parse("table tbody tr").unwrap()) {
                let name = text_of(&select_one(&row, "th.airport-name")?);
                let period = text_of(&select_one(&row, "td.period")?);
                airports.push(AirportEntry::new(name).with_attribute("period", period));
            }
            if airports.is_empty() {
                return Err(ParseError::Structure(format!(
                    "region block {region:?} has no airport rows"
                )));
            }
            flight_infos.push(FlightInfo { region, airports });
        }

        if flight_infos.is_empty() {
            // No region blocks is only valid alongside the all-clear notice.
            select_one(&area, "p.normal-operation")?;
        }

        Ok(Parsed {
            has_irregularity: !flight_infos.is_empty(),
            flight_infos,
            update_time,
        })
    }
}
