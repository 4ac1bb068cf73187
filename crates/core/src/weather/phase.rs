//! Weather phases, seasons, per-key lookup tables and transition messages

use serde::{Deserialize, Serialize};
use std::fmt;

/// The single weather value active over the whole grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum WeatherPhase {
    /// Open sky
    #[default]
    Clear = 0,
    /// Steady rain
    Rain = 1,
    /// Escalated rain with lightning; never rolled directly
    Thunderstorm = 2,
    /// Dry wind
    Wind = 3,
    /// Snowfall
    Snow = 4,
}

impl WeatherPhase {
    /// All phases in declaration order
    pub const ALL: [WeatherPhase; 5] = [
        WeatherPhase::Clear,
        WeatherPhase::Rain,
        WeatherPhase::Thunderstorm,
        WeatherPhase::Wind,
        WeatherPhase::Snow,
    ];

    /// Phases that carry a base weight in the seasonal roll
    #[inline]
    pub fn is_base(self) -> bool {
        !matches!(self, WeatherPhase::Thunderstorm)
    }

    /// Phases whose cloud cover blocks sunlight
    #[inline]
    pub fn is_cloudy(self) -> bool {
        matches!(
            self,
            WeatherPhase::Rain | WeatherPhase::Thunderstorm | WeatherPhase::Snow
        )
    }

    /// Convert from u8 for FFI compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            WeatherPhase::Clear => "Clear",
            WeatherPhase::Rain => "Rain",
            WeatherPhase::Thunderstorm => "Thunderstorm",
            WeatherPhase::Wind => "Wind",
            WeatherPhase::Snow => "Snow",
        }
    }
}

impl fmt::Display for WeatherPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// Season of the year; cycles on its own fixed-length timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Season {
    #[default]
    Spring = 0,
    Summer = 1,
    Autumn = 2,
    Winter = 3,
}

impl Season {
    /// All seasons in calendar order
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// The season that follows this one
    pub fn next(self) -> Self {
        match self {
            Season::Spring => Season::Summer,
            Season::Summer => Season::Autumn,
            Season::Autumn => Season::Winter,
            Season::Winter => Season::Spring,
        }
    }

    /// Convert from u8 for FFI compatibility
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(usize::from(value)).copied()
    }

    /// Convert to u8 for FFI compatibility
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// One value per season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonTable<T> {
    pub spring: T,
    pub summer: T,
    pub autumn: T,
    pub winter: T,
}

impl<T> SeasonTable<T> {
    /// Value for `season`
    pub fn get(&self, season: Season) -> &T {
        match season {
            Season::Spring => &self.spring,
            Season::Summer => &self.summer,
            Season::Autumn => &self.autumn,
            Season::Winter => &self.winter,
        }
    }

    /// Entries paired with their season, in calendar order
    pub fn iter(&self) -> impl Iterator<Item = (Season, &T)> {
        Season::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

/// One value per weather phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTable<T> {
    pub clear: T,
    pub rain: T,
    pub thunderstorm: T,
    pub wind: T,
    pub snow: T,
}

impl<T> PhaseTable<T> {
    /// Value for `phase`
    pub fn get(&self, phase: WeatherPhase) -> &T {
        match phase {
            WeatherPhase::Clear => &self.clear,
            WeatherPhase::Rain => &self.rain,
            WeatherPhase::Thunderstorm => &self.thunderstorm,
            WeatherPhase::Wind => &self.wind,
            WeatherPhase::Snow => &self.snow,
        }
    }

    /// Entries paired with their phase, in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (WeatherPhase, &T)> {
        WeatherPhase::ALL.into_iter().map(move |p| (p, self.get(p)))
    }
}

/// Ordered notification for audio, VFX and lighting collaborators
///
/// A phase change always queues `PhaseEnded(old)` immediately followed by
/// `PhaseStarted(new)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherEvent {
    /// The phase stopped being active
    PhaseEnded(WeatherPhase),
    /// The phase became active
    PhaseStarted(WeatherPhase),
    /// The season timer rolled over
    SeasonChanged { from: Season, to: Season },
}

impl WeatherEvent {
    /// Convert the event kind to u8 for FFI compatibility
    pub fn kind_u8(&self) -> u8 {
        match self {
            WeatherEvent::PhaseEnded(_) => 0,
            WeatherEvent::PhaseStarted(_) => 1,
            WeatherEvent::SeasonChanged { .. } => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_classification() {
        assert!(WeatherPhase::Clear.is_base());
        assert!(!WeatherPhase::Thunderstorm.is_base());
        assert!(WeatherPhase::Snow.is_cloudy());
        assert!(WeatherPhase::Thunderstorm.is_cloudy());
        assert!(!WeatherPhase::Wind.is_cloudy());
    }

    #[test]
    fn test_u8_conversion() {
        for phase in WeatherPhase::ALL {
            assert_eq!(WeatherPhase::from_u8(phase.as_u8()), Some(phase));
        }
        assert_eq!(WeatherPhase::from_u8(5), None);
        for season in Season::ALL {
            assert_eq!(Season::from_u8(season.as_u8()), Some(season));
        }
        assert_eq!(Season::from_u8(4), None);
    }

    #[test]
    fn test_season_cycle() {
        let mut season = Season::Spring;
        for expected in [Season::Summer, Season::Autumn, Season::Winter, Season::Spring] {
            season = season.next();
            assert_eq!(season, expected);
        }
    }

    #[test]
    fn test_tables() {
        let table = SeasonTable {
            spring: 1,
            summer: 2,
            autumn: 3,
            winter: 4,
        };
        assert_eq!(*table.get(Season::Autumn), 3);
        assert_eq!(table.iter().map(|(_, v)| *v).sum::<i32>(), 10);

        let phases = PhaseTable {
            clear: 'c',
            rain: 'r',
            thunderstorm: 't',
            wind: 'w',
            snow: 's',
        };
        assert_eq!(*phases.get(WeatherPhase::Thunderstorm), 't');
        assert_eq!(phases.iter().count(), 5);
    }
}
