//! Fixed-width decimal codec between text and numeric blocks.
//!
//! Every character becomes its code point, left padded with zeros to
//! `char_width` digits. The digit string of the whole message is then cut
//! into `block_width` digit blocks, the last one right padded with zeros.
//!
//! Decoding keeps the shortest whole number of character groups that leaves
//! only zeros behind, and at most `block_width - 1` of them. A message whose
//! final characters are U+0000 and fit in that window loses them on the way
//! back.

use crate::error::{Error, Result};
use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "CodecWidths")]
pub struct Codec {
    char_width: usize,
    block_width: usize,
}

// Unchecked form read from config files
#[derive(Deserialize)]
struct CodecWidths {
    #[serde(default = "default_char_width")]
    char_width: usize,
    #[serde(default = "default_block_width")]
    block_width: usize,
}

impl TryFrom<CodecWidths> for Codec {
    type Error = Error;

    fn try_from(widths: CodecWidths) -> Result<Codec> {
        Codec::new(widths.char_width, widths.block_width)
    }
}

fn default_char_width() -> usize {
    3
}

fn default_block_width() -> usize {
    4
}

impl Default for Codec {
    fn default() -> Self {
        Codec {
            char_width: default_char_width(),
            block_width: default_block_width(),
        }
    }
}

impl Codec {
    /// A codec with `char_width` digits per code point and `block_width`
    /// digits per block. Both must be at least 1.
    pub fn new(char_width: usize, block_width: usize) -> Result<Codec> {
        if char_width == 0 || block_width == 0 {
            return Err(Error::InvalidCodec {
                char_width,
                block_width,
                reason: "widths must be at least one digit".to_owned(),
            });
        }
        Ok(Codec {
            char_width,
            block_width,
        })
    }

    /// Digits per character code point.
    pub fn char_width(&self) -> usize {
        self.char_width
    }

    /// Digits per block.
    pub fn block_width(&self) -> usize {
        self.block_width
    }

    /// Code points must be strictly below this value.
    pub fn capacity(&self) -> u64 {
        10u64.saturating_pow(self.char_width as u32)
    }

    /// Every block this codec produces is strictly below this value.
    pub fn block_limit(&self) -> BigUint {
        BigUint::from(10u8).pow(self.block_width as u32)
    }

    pub fn encode(&self, message: &str) -> Result<Vec<BigUint>> {
        let capacity = self.capacity();
        let mut digits = String::with_capacity(message.len() * self.char_width);
        for character in message.chars() {
            let code_point = character as u32;
            if u64::from(code_point) >= capacity {
                return Err(Error::EncodingOverflow {
                    character,
                    code_point,
                    capacity: capacity.min(u64::from(u32::MAX)) as u32,
                });
            }
            digits.push_str(&format!("{:0width$}", code_point, width = self.char_width));
        }

        digits
            .as_bytes()
            .chunks(self.block_width)
            .map(|chunk| {
                let mut chunk = chunk.to_vec();
                chunk.resize(self.block_width, b'0');
                BigUint::parse_bytes(&chunk, 10)
                    .ok_or_else(|| Error::Parse(format!("not a decimal block: {:?}", chunk)))
            })
            .collect()
    }

    pub fn decode(&self, blocks: &[BigUint]) -> Result<String> {
        let mut digits = String::with_capacity(blocks.len() * self.block_width);
        for block in blocks {
            let block = block.to_str_radix(10);
            if block.len() > self.block_width {
                return Err(Error::Parse(format!(
                    "block {} is wider than {} digits",
                    block, self.block_width
                )));
            }
            digits.push_str(&format!("{:0>width$}", block, width = self.block_width));
        }

        let len = self.unpadded_len(&digits)?;
        digits.as_bytes()[..len]
            .chunks(self.char_width)
            .map(|group| {
                std::str::from_utf8(group)
                    .ok()
                    .and_then(|group| group.parse::<BigUint>().ok())
                    .and_then(|code| code.to_u32())
                    .and_then(char::from_u32)
                    .ok_or_else(|| Error::Parse(format!("bad character group {:?}", group)))
            })
            .collect()
    }

    // Encoding pads with fewer than `block_width` zeros, so the message is a
    // whole number of character groups ending inside that window
    fn unpadded_len(&self, digits: &str) -> Result<usize> {
        let total = digits.len();
        let shortest = total.saturating_sub(self.block_width - 1);
        (shortest..=total)
            .filter(|len| len % self.char_width == 0)
            .find(|&len| digits.as_bytes()[len..].iter().all(|&digit| digit == b'0'))
            .ok_or_else(|| {
                Error::Parse(format!(
                    "{} digits do not end in {}-digit character groups",
                    total, self.char_width
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(values: &[u32]) -> Vec<BigUint> {
        values.iter().map(|v| BigUint::from(*v)).collect()
    }

    #[test]
    fn encode_works() {
        let codec = Codec::default();
        // "072105033" -> "0721" "0503" "3000"
        assert_eq!(codec.encode("Hi!").unwrap(), blocks(&[721, 503, 3000]));
        // "065" -> "0650"
        assert_eq!(codec.encode("A").unwrap(), blocks(&[650]));
        // exactly three blocks, no padding
        assert_eq!(codec.encode("ABCD").unwrap(), blocks(&[650, 6606, 7068]));
        assert!(codec.encode("").unwrap().is_empty());
    }

    #[test]
    fn decode_works() {
        let codec = Codec::default();
        assert_eq!(codec.decode(&blocks(&[721, 503, 3000])).unwrap(), "Hi!");
        assert_eq!(codec.decode(&blocks(&[650])).unwrap(), "A");
        assert_eq!(codec.decode(&blocks(&[650, 6606, 7068])).unwrap(), "ABCD");
        assert_eq!(codec.decode(&[]).unwrap(), "");
    }

    #[test]
    fn round_trip_over_padding_lengths() {
        let codec = Codec::default();
        for message in ["A", "AB", "ABC", "ABCD", "This is a test message !", "été ϕ"] {
            let encoded = codec.encode(message).unwrap();
            assert!(encoded.iter().all(|b| b < &codec.block_limit()));
            assert_eq!(codec.decode(&encoded).unwrap(), message);
        }
    }

    #[test]
    fn wide_code_points_overflow() {
        let codec = Codec::default();
        match codec.encode("ok \u{3e8}") {
            Err(Error::EncodingOverflow {
                character,
                code_point,
                capacity,
            }) => {
                assert_eq!(character, '\u{3e8}');
                assert_eq!(code_point, 1000);
                assert_eq!(capacity, 1000);
            }
            other => panic!("expected an overflow, got {:?}", other),
        }
        assert!(codec.encode("\u{3e7}").is_ok());
    }

    #[test]
    fn wider_codec_works() {
        let codec = Codec::new(6, 7).unwrap();
        let message = "naïve → 😀";
        assert!(Codec::default().encode(message).is_err());
        let encoded = codec.encode(message).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), message);
    }

    #[test]
    fn trailing_nul_is_lost() {
        let codec = Codec::default();
        // four characters fill whole blocks, so the final 000 is real data
        let encoded = codec.encode("abc\0").unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), "abc");
    }

    #[test]
    fn oversized_block_fails() {
        let codec = Codec::default();
        assert!(matches!(
            codec.decode(&blocks(&[12345])),
            Err(Error::Parse(_))
        ));
        // "1234" leaves a nonzero digit after the last whole group
        assert!(matches!(
            codec.decode(&blocks(&[1234])),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn long_padding_is_stripped() {
        // "065" -> "06500000"
        let codec = Codec::new(3, 8).unwrap();
        assert_eq!(codec.encode("A").unwrap(), blocks(&[6_500_000]));
        assert_eq!(codec.decode(&blocks(&[6_500_000])).unwrap(), "A");
    }

    #[test]
    fn round_trip_over_widths() {
        for (char_width, block_width) in [(2, 7), (3, 3), (3, 5), (3, 8), (3, 10), (4, 3), (4, 5)] {
            let codec = Codec::new(char_width, block_width).unwrap();
            for message in ["A", "AB", "ABC", "ABCDEFG", "HELLO WORLD"] {
                let encoded = codec.encode(message).unwrap();
                assert_eq!(
                    codec.decode(&encoded).unwrap(),
                    message,
                    "widths ({char_width}, {block_width})"
                );
            }
        }
    }

    #[test]
    fn zero_widths_fail() {
        assert!(matches!(Codec::new(0, 4), Err(Error::InvalidCodec { .. })));
        assert!(matches!(Codec::new(3, 0), Err(Error::InvalidCodec { .. })));
        assert!(serde_json::from_str::<Codec>(r#"{ "block_width": 0 }"#).is_err());
        assert!(serde_json::from_str::<Codec>(r#"{ "char_width": 0 }"#).is_err());

        let codec: Codec = serde_json::from_str(r#"{ "block_width": 5 }"#).unwrap();
        assert_eq!(codec, Codec::new(3, 5).unwrap());
        assert_eq!(serde_json::from_str::<Codec>("{}").unwrap(), Codec::default());
    }
}
