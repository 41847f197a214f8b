//! Inertial navigation records carried in sentences
//!
//! Record types are identified by the sentence header:
//! - `$GTIMU`: raw inertial measurement (gyro, accelerometer, temperature)
//! - `$GPFPD`: fused position, attitude and velocity

use alloc::string::{String, ToString};
use core::fmt;
use core::str::FromStr;

use serde::Serialize;

use crate::sentence::ParsedSentence;

/// Header of an IMU record
pub const HEADER_IMU: &str = "$GTIMU";
/// Header of a fused position record
pub const HEADER_POSITION: &str = "$GPFPD";

/// Errors that can occur while decoding a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// Header does not name a known record
    UnknownHeader(String),
    /// Sentence has fewer fields than the record needs
    MissingField {
        header: &'static str,
        index: usize,
    },
    /// Field is present but not a number
    InvalidNumber {
        header: &'static str,
        index: usize,
    },
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordError::UnknownHeader(header) => write!(f, "unknown record header `{header}`"),
            RecordError::MissingField { header, index } => {
                write!(f, "{header} record is missing field {index}")
            }
            RecordError::InvalidNumber { header, index } => {
                write!(f, "{header} record field {index} is not a number")
            }
        }
    }
}

#[cfg(any(test, feature = "std"))]
impl std::error::Error for RecordError {}

/// Raw inertial measurement
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ImuRecord {
    /// GPS week number
    pub gps_week: u16,
    /// Seconds into the GPS week
    pub gps_time: f64,
    /// Angular rate X, Y, Z (deg/s)
    pub gyro: [f64; 3],
    /// Acceleration X, Y, Z (g)
    pub acc: [f64; 3],
    /// Sensor temperature (°C)
    pub temperature: f64,
}

/// Fused position, attitude and velocity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionRecord {
    /// GPS week number
    pub gps_week: u16,
    /// Seconds into the GPS week
    pub gps_time: f64,
    /// Heading (deg)
    pub heading: f64,
    /// Pitch (deg)
    pub pitch: f64,
    /// Roll (deg)
    pub roll: f64,
    /// Latitude (deg)
    pub latitude: f64,
    /// Longitude (deg)
    pub longitude: f64,
    /// Altitude (m)
    pub altitude: f64,
    /// East velocity (m/s)
    pub velocity_east: f64,
    /// North velocity (m/s)
    pub velocity_north: f64,
    /// Up velocity (m/s)
    pub velocity_up: f64,
    /// Antenna baseline length (m)
    pub baseline: f64,
    /// Satellites seen by the primary antenna
    pub satellites_primary: u8,
    /// Satellites seen by the secondary antenna
    pub satellites_secondary: u8,
    /// Receiver status code, passed through as sent
    pub status: String,
}

/// A decoded record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsRecord {
    /// `$GTIMU`
    Imu(ImuRecord),
    /// `$GPFPD`
    Position(PositionRecord),
}

impl InsRecord {
    /// Decode a record from a sentence
    ///
    /// Fields beyond the ones a record uses are ignored.
    pub fn from_sentence(sentence: &ParsedSentence) -> Result<Self, RecordError> {
        match sentence.header.as_str() {
            HEADER_IMU => {
                let f = Fields::new(HEADER_IMU, sentence);
                Ok(InsRecord::Imu(ImuRecord {
                    gps_week: f.number(0)?,
                    gps_time: f.number(1)?,
                    gyro: [f.number(2)?, f.number(3)?, f.number(4)?],
                    acc: [f.number(5)?, f.number(6)?, f.number(7)?],
                    temperature: f.number(8)?,
                }))
            }
            HEADER_POSITION => {
                let f = Fields::new(HEADER_POSITION, sentence);
                Ok(InsRecord::Position(PositionRecord {
                    gps_week: f.number(0)?,
                    gps_time: f.number(1)?,
                    heading: f.number(2)?,
                    pitch: f.number(3)?,
                    roll: f.number(4)?,
                    latitude: f.number(5)?,
                    longitude: f.number(6)?,
                    altitude: f.number(7)?,
                    velocity_east: f.number(8)?,
                    velocity_north: f.number(9)?,
                    velocity_up: f.number(10)?,
                    baseline: f.number(11)?,
                    satellites_primary: f.number(12)?,
                    satellites_secondary: f.number(13)?,
                    status: f.text(14)?.to_string(),
                }))
            }
            other => Err(RecordError::UnknownHeader(other.to_string())),
        }
    }

    /// Header this record is sent under
    pub fn header(&self) -> &'static str {
        match self {
            InsRecord::Imu(_) => HEADER_IMU,
            InsRecord::Position(_) => HEADER_POSITION,
        }
    }
}

impl TryFrom<&ParsedSentence> for InsRecord {
    type Error = RecordError;

    fn try_from(sentence: &ParsedSentence) -> Result<Self, Self::Error> {
        Self::from_sentence(sentence)
    }
}

/// Indexed field access that reports errors against a header
struct Fields<'a> {
    header: &'static str,
    sentence: &'a ParsedSentence,
}

impl<'a> Fields<'a> {
    fn new(header: &'static str, sentence: &'a ParsedSentence) -> Self {
        Self { header, sentence }
    }

    fn text(&self, index: usize) -> Result<&'a str, RecordError> {
        self.sentence.field(index).ok_or(RecordError::MissingField {
            header: self.header,
            index,
        })
    }

    fn number<T: FromStr>(&self, index: usize) -> Result<T, RecordError> {
        self.text(index)?
            .trim()
            .parse()
            .map_err(|_| RecordError::InvalidNumber {
                header: self.header,
                index,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::XorChecksum;
    use crate::framer::Framer;
    use crate::sentence::SentenceFramer;

    const IMU: &str = "$GTIMU,2200,345600.250,-0.12,0.05,0.33,0.012,-0.004,1.002,36.5*5F";
    const POSITION: &str = "$GPFPD,2200,345600.250,92.50,-1.20,0.80,31.2304,121.4737,12.3,0.10,-0.20,0.01,1.50,12,10,4B*01";

    #[test]
    fn test_imu_record() {
        let record = InsRecord::from_sentence(&ParsedSentence::parse(IMU)).unwrap();

        let InsRecord::Imu(imu) = record else {
            panic!("expected IMU record");
        };
        assert_eq!(imu.gps_week, 2200);
        assert_eq!(imu.gps_time, 345600.25);
        assert_eq!(imu.gyro, [-0.12, 0.05, 0.33]);
        assert_eq!(imu.acc, [0.012, -0.004, 1.002]);
        assert_eq!(imu.temperature, 36.5);
    }

    #[test]
    fn test_position_record() {
        let record = InsRecord::from_sentence(&ParsedSentence::parse(POSITION)).unwrap();
        assert_eq!(record.header(), HEADER_POSITION);

        let InsRecord::Position(pos) = record else {
            panic!("expected position record");
        };
        assert_eq!(pos.heading, 92.5);
        assert_eq!(pos.latitude, 31.2304);
        assert_eq!(pos.longitude, 121.4737);
        assert_eq!(pos.velocity_north, -0.2);
        assert_eq!(pos.satellites_primary, 12);
        assert_eq!(pos.satellites_secondary, 10);
        assert_eq!(pos.status, "4B");
    }

    #[test]
    fn test_records_from_checked_stream() {
        let mut framer = SentenceFramer::with_checksum(XorChecksum);
        let stream = [IMU, "\r\n", POSITION, "\r\n"].concat();

        let records: Vec<_> = framer
            .feed_str(&stream)
            .iter()
            .map(InsRecord::try_from)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].header(), HEADER_IMU);
        assert_eq!(records[1].header(), HEADER_POSITION);
    }

    #[test]
    fn test_unknown_header() {
        let err = InsRecord::from_sentence(&ParsedSentence::parse("$GPGGA,1*00")).unwrap_err();
        assert_eq!(err, RecordError::UnknownHeader("$GPGGA".to_string()));
    }

    #[test]
    fn test_missing_field() {
        let err = InsRecord::from_sentence(&ParsedSentence::parse("$GTIMU,100,2.5*5A")).unwrap_err();
        assert_eq!(
            err,
            RecordError::MissingField {
                header: HEADER_IMU,
                index: 2
            }
        );
    }

    #[test]
    fn test_invalid_number() {
        let raw = "$GTIMU,2200,,0,0,0,0,0,0,0*00";
        let err = InsRecord::from_sentence(&ParsedSentence::parse(raw)).unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidNumber {
                header: HEADER_IMU,
                index: 1
            }
        );
        assert_eq!(err.to_string(), "$GTIMU record field 1 is not a number");
    }

    #[test]
    fn test_record_serializes_with_kind() {
        let record = InsRecord::from_sentence(&ParsedSentence::parse(IMU)).unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "imu");
        assert_eq!(json["gps_week"], 2200);
    }
}
