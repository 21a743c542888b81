use scraper::{Html, Selector};

use super::{AirlineSource, Parsed, select_one, text_of};
use crate::error::ParseError;
use crate::model::{AirportEntry, FlightInfo};

/// JAL's flight status page. Regions are `section` elements under
/// `div.irregular-list`; each airport item carries a date and a free-text
/// description, unlike ANA's single period field. An all-clear page replaces
/// the list with a `p.info-normal` notice.
pub struct Jal;

impl AirlineSource for Jal {
    fn source_key(&self) -> &'static str {
        "jal"
    }

    fn url(&self) -> &'static str {
        "https://www.jal.co.jp/cms/other/ja/weather_info_dom.html"
    }

    fn title(&self) -> &'static str {
        "JAL irregular flight operations"
    }

    fn parse(&self, html: &str) -> Result<Parsed, ParseError> {
        let document = Html::parse_document(html);
        let root = document.root_element();

        let area = select_one(&root, "div.info-irregular")?;
        let update_time = text_of(&select_one(&area, "p.date-update")?);

        let mut flight_infos = Vec::new();
        for block in area.select(&Selector::parse("div.irregular-list section").unwrap()) {
            let region = text_of(&select_one(&block, "h2.area")?);
            let mut airports = Vec::new();
            for item in block.select(&Selector::parse("ul.airport-list li").unwrap()) {
                let name = text_of(&select_one(&item, "span.airport")?);
                let date = text_of(&select_one(&item, "span.date")?);
                let content = text_of(&select_one(&item, "p.text")?);
                airports.push(
                    AirportEntry::new(name)
                        .with_attribute("date", date)
                        .with_attribute("content", content),
                );
            }
            if airports.is_empty() {
                return Err(ParseError::Structure(format!(
                    "area {region:?} has no airport items"
                )));
            }
            flight_infos.push(FlightInfo { region, airports });
        }

        if flight_infos.is_empty() {
            select_one(&area, "p.info-normal")?;
        }

        Ok(Parsed {
            has_irregularity: !flight_infos.is_empty(),
            flight_infos,
            update_time,
        })
    }
}
