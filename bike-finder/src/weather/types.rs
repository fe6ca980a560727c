//! Current-weather response types and the riding-conditions rating.

use serde::{Deserialize, Serialize};

use super::error::WeatherError;

/// OpenWeatherMap `weather` response, the fields we read.
#[derive(Debug, Deserialize)]
pub(super) struct CurrentWeatherDto {
    main: MainDto,
    wind: Option<WindDto>,
    weather: Vec<ConditionDto>,
}

#[derive(Debug, Deserialize)]
struct MainDto {
    temp: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct WindDto {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionDto {
    description: String,
    icon: String,
}

/// Current weather at a point, imperial units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weather {
    /// Degrees Fahrenheit
    pub temperature: f64,
    pub feels_like: f64,
    /// Percent
    pub humidity: f64,
    /// Miles per hour; zero when the report has no wind section
    pub wind_speed: f64,
    /// Title-cased, e.g. "Scattered Clouds"
    pub description: String,
    pub icon: String,
}

impl TryFrom<CurrentWeatherDto> for Weather {
    type Error = WeatherError;

    fn try_from(dto: CurrentWeatherDto) -> Result<Self, Self::Error> {
        let condition = dto
            .weather
            .into_iter()
            .next()
            .ok_or(WeatherError::NoConditions)?;

        Ok(Self {
            temperature: dto.main.temp,
            feels_like: dto.main.feels_like,
            humidity: dto.main.humidity,
            wind_speed: dto.wind.map_or(0.0, |w| w.speed),
            description: title_case(&condition.description),
            icon: condition.icon,
        })
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// How pleasant it is to ride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Conditions {
    Perfect,
    Good,
    #[serde(rename = "OK")]
    Ok,
}

impl Conditions {
    /// Rate by temperature (°F) and wind speed (mph).
    pub fn rate(temperature: f64, wind_speed: f64) -> Self {
        if (65.0..=80.0).contains(&temperature) && wind_speed < 15.0 {
            Conditions::Perfect
        } else if (50.0..=85.0).contains(&temperature) && wind_speed < 20.0 {
            Conditions::Good
        } else {
            Conditions::Ok
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Conditions::Perfect => "Perfect",
            Conditions::Good => "Good",
            Conditions::Ok => "OK",
        }
    }
}

impl Weather {
    pub fn conditions(&self) -> Conditions {
        Conditions::rate(self.temperature, self.wind_speed)
    }
}
