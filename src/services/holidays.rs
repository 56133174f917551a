use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::AppError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    pub name: String,
    pub date: String,
    pub kind: String,
    pub description: String,
    pub country: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidaysResponse {
    pub holidays: Vec<Holiday>,
    pub source: &'static str,
    pub country: String,
    pub year: i32,
}

#[derive(Debug, Deserialize)]
struct CalendarificEnvelope {
    response: Option<CalendarificResponse>,
}

#[derive(Debug, Deserialize)]
struct CalendarificResponse {
    #[serde(default)]
    holidays: Vec<CalendarificHoliday>,
}

#[derive(Debug, Deserialize)]
struct CalendarificHoliday {
    name: String,
    date: CalendarificDate,
    #[serde(default)]
    r#type: Vec<String>,
    #[serde(default)]
    description: Option<String>,
    country: Option<CalendarificCountry>,
}

#[derive(Debug, Deserialize)]
struct CalendarificDate {
    iso: String,
}

#[derive(Debug, Deserialize)]
struct CalendarificCountry {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NagerHoliday {
    name: String,
    date: String,
    #[serde(default)]
    local_name: Option<String>,
}

/// Public-holiday lookup with a fallback chain: the keyed Calendarific API
/// when configured, the free Nager.Date API otherwise, and a built-in list
/// when both upstreams are unreachable.
#[derive(Clone)]
pub struct HolidayService {
    client: reqwest::Client,
    config: Config,
}

impl HolidayService {
    pub fn new(config: Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub async fn holidays(&self, country: &str, year: i32) -> Result<HolidaysResponse, AppError> {
        if let Some(api_key) = self.config.holidays_api_key.as_deref() {
            match self.fetch_calendarific(api_key, country, year).await {
                Ok(holidays) => {
                    return Ok(HolidaysResponse {
                        holidays,
                        source: "calendarific",
                        country: country.to_string(),
                        year,
                    });
                }
                Err(err) => {
                    log::warn!("Calendarific lookup failed, trying fallback: {}", err);
                }
            }
        }

        match self.fetch_nager(country, year).await {
            Ok(holidays) => Ok(HolidaysResponse {
                holidays,
                source: "nager",
                country: country.to_string(),
                year,
            }),
            Err(err) => {
                log::warn!("Nager lookup failed, serving defaults: {}", err);
                Ok(HolidaysResponse {
                    holidays: default_holidays(year),
                    source: "default",
                    country: country.to_string(),
                    year,
                })
            }
        }
    }

    async fn fetch_calendarific(
        &self,
        api_key: &str,
        country: &str,
        year: i32,
    ) -> anyhow::Result<Vec<Holiday>> {
        let url = format!(
            "https://calendarific.com/api/v2/holidays?api_key={}&country={}&year={}&type=national",
            api_key, country, year
        );

        let envelope: CalendarificEnvelope = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let holidays = envelope
            .response
            .map(|r| r.holidays)
            .unwrap_or_default()
            .into_iter()
            .map(|h| Holiday {
                name: h.name,
                date: h.date.iso,
                kind: h.r#type.into_iter().next().unwrap_or_else(|| "public".to_string()),
                description: h.description.unwrap_or_default(),
                country: h.country.and_then(|c| c.name).unwrap_or_default(),
            })
            .collect();

        Ok(holidays)
    }

    async fn fetch_nager(&self, country: &str, year: i32) -> anyhow::Result<Vec<Holiday>> {
        let url = format!("https://date.nager.at/api/v3/PublicHolidays/{}/{}", year, country);

        let raw: Vec<NagerHoliday> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let holidays = raw
            .into_iter()
            .map(|h| Holiday {
                name: h.name,
                date: h.date,
                kind: "public".to_string(),
                description: h.local_name.unwrap_or_default(),
                country: country.to_string(),
            })
            .collect();

        Ok(holidays)
    }
}

fn default_holidays(year: i32) -> Vec<Holiday> {
    [
        ("New Year's Day", format!("{year}-01-01"), "New Year's Day"),
        ("Republic Day", format!("{year}-01-26"), "Republic Day of India"),
        ("Independence Day", format!("{year}-08-15"), "Independence Day of India"),
        ("Gandhi Jayanti", format!("{year}-10-02"), "Mahatma Gandhi's Birthday"),
    ]
    .into_iter()
    .map(|(name, date, description)| Holiday {
        name: name.to_string(),
        date,
        kind: "public".to_string(),
        description: description.to_string(),
        country: "India".to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_holidays_track_the_requested_year() {
        let holidays = default_holidays(2026);
        assert_eq!(holidays.len(), 4);
        assert!(holidays.iter().all(|h| h.date.starts_with("2026-")));
    }
}
