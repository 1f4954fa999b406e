//! Line parameter types.
//!
//! Baud rate, data bits, stop bits and parity: the framing configuration of
//! a serial link. Each enum converts from the integer or letter form used in
//! configuration files and into the matching `serialport` type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A line parameter value outside its permitted range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineParameterError {
    #[error("data bits must be 5, 6, 7 or 8, got {0}")]
    DataBits(u8),

    #[error("stop bits must be 1 or 2, got {0}")]
    StopBits(u8),

    #[error("parity must be N, E or O, got '{0}'")]
    Parity(String),
}

/// Number of data bits per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DataBits {
    Five,
    Six,
    Seven,
    Eight,
}

impl TryFrom<u8> for DataBits {
    type Error = LineParameterError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            5 => Ok(Self::Five),
            6 => Ok(Self::Six),
            7 => Ok(Self::Seven),
            8 => Ok(Self::Eight),
            other => Err(LineParameterError::DataBits(other)),
        }
    }
}

impl From<DataBits> for u8 {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => 5,
            DataBits::Six => 6,
            DataBits::Seven => 7,
            DataBits::Eight => 8,
        }
    }
}

impl From<DataBits> for serialport::DataBits {
    fn from(bits: DataBits) -> Self {
        match bits {
            DataBits::Five => serialport::DataBits::Five,
            DataBits::Six => serialport::DataBits::Six,
            DataBits::Seven => serialport::DataBits::Seven,
            DataBits::Eight => serialport::DataBits::Eight,
        }
    }
}

/// Number of stop bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum StopBits {
    One,
    Two,
}

impl TryFrom<u8> for StopBits {
    type Error = LineParameterError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(LineParameterError::StopBits(other)),
        }
    }
}

impl From<StopBits> for u8 {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => 1,
            StopBits::Two => 2,
        }
    }
}

impl From<StopBits> for serialport::StopBits {
    fn from(bits: StopBits) -> Self {
        match bits {
            StopBits::One => serialport::StopBits::One,
            StopBits::Two => serialport::StopBits::Two,
        }
    }
}

/// Parity checking modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Parity {
    None,
    Even,
    Odd,
}

impl Parity {
    /// Single-letter form used in `8E1` style notation.
    pub fn letter(self) -> char {
        match self {
            Parity::None => 'N',
            Parity::Even => 'E',
            Parity::Odd => 'O',
        }
    }
}

impl FromStr for Parity {
    type Err = LineParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "n" | "none" => Ok(Self::None),
            "e" | "even" => Ok(Self::Even),
            "o" | "odd" => Ok(Self::Odd),
            _ => Err(LineParameterError::Parity(s.to_string())),
        }
    }
}

impl TryFrom<String> for Parity {
    type Error = LineParameterError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Parity> for String {
    fn from(parity: Parity) -> Self {
        parity.letter().to_string()
    }
}

impl From<Parity> for serialport::Parity {
    fn from(parity: Parity) -> Self {
        match parity {
            Parity::None => serialport::Parity::None,
            Parity::Odd => serialport::Parity::Odd,
            Parity::Even => serialport::Parity::Even,
        }
    }
}

/// The line parameters handed to the driver when a port is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineParameters {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub stop_bits: StopBits,
    pub parity: Parity,
}

impl fmt::Display for LineParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}{}{}",
            self.baud_rate,
            u8::from(self.data_bits),
            self.parity.letter(),
            u8::from(self.stop_bits)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_bits_range() {
        assert_eq!(DataBits::try_from(7), Ok(DataBits::Seven));
        assert_eq!(DataBits::try_from(4), Err(LineParameterError::DataBits(4)));
        assert_eq!(DataBits::try_from(9), Err(LineParameterError::DataBits(9)));
    }

    #[test]
    fn test_stop_bits_range() {
        assert_eq!(StopBits::try_from(2), Ok(StopBits::Two));
        assert!(StopBits::try_from(0).is_err());
        assert!(StopBits::try_from(3).is_err());
    }

    #[test]
    fn test_parity_parsing() {
        assert_eq!("E".parse::<Parity>(), Ok(Parity::Even));
        assert_eq!("n".parse::<Parity>(), Ok(Parity::None));
        assert_eq!("Odd".parse::<Parity>(), Ok(Parity::Odd));
        assert!("mark".parse::<Parity>().is_err());
    }

    #[test]
    fn test_serialport_conversions() {
        let bits: serialport::DataBits = DataBits::Eight.into();
        assert_eq!(bits, serialport::DataBits::Eight);

        let parity: serialport::Parity = Parity::Even.into();
        assert_eq!(parity, serialport::Parity::Even);

        let stop: serialport::StopBits = StopBits::Two.into();
        assert_eq!(stop, serialport::StopBits::Two);
    }

    #[test]
    fn test_line_parameters_display() {
        let params = LineParameters {
            baud_rate: 19200,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::Even,
        };
        assert_eq!(params.to_string(), "19200 8E1");
    }

    #[test]
    fn test_serde_forms() {
        let params: LineParameters = serde_json::from_str(
            r#"{"baud_rate": 9600, "data_bits": 7, "stop_bits": 2, "parity": "none"}"#,
        )
        .unwrap();
        assert_eq!(params.data_bits, DataBits::Seven);
        assert_eq!(params.stop_bits, StopBits::Two);
        assert_eq!(params.parity, Parity::None);

        let json = serde_json::to_value(params).unwrap();
        assert_eq!(json["parity"], "N");
        assert_eq!(json["data_bits"], 7);

        let bad: Result<LineParameters, _> = serde_json::from_str(
            r#"{"baud_rate": 9600, "data_bits": 9, "stop_bits": 1, "parity": "E"}"#,
        );
        assert!(bad.is_err());
    }
}
