//! Reading files as text in a configured encoding.
//!
//! Labels are resolved with [`encoding_rs`] (WHATWG label set). Malformed
//! input never fails a read: undecodable bytes become U+FFFD.

use std::{io, path::Path};

use encoding_rs::Encoding;

use crate::{Error, Result};

/// What to do with a byte order mark at the start of a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BomHandling {
  /// Decode it like any other character (U+FEFF).
  Keep,
  /// Drop a BOM of the configured encoding.
  Remove,
  /// Let a BOM pick the encoding; fall back to the configured one.
  Sniff,
}

/// Codec names that are not WHATWG labels, or that need BOM handling the
/// plain label does not get. Keys use `-`, never `_`.
const ALIASES: &[(&str, &str, BomHandling)] = &[
  ("cp932", "windows-31j", BomHandling::Keep),
  ("mskanji", "ms_kanji", BomHandling::Keep),
  ("utf-8-sig", "utf-8", BomHandling::Remove),
  ("utf-16", "utf-16le", BomHandling::Sniff),
];

#[derive(Debug, Clone, Copy)]
pub struct TextDecoder {
  encoding:           &'static Encoding,
  bom:                BomHandling,
  normalize_newlines: bool,
}

impl TextDecoder {
  /// Resolve `label` to an encoding. Accepts WHATWG labels, the same with
  /// `_` in place of `-` (`utf_8`, `euc_jp`), and a few codec names such as
  /// `cp932`, `utf-8-sig` and `utf-16`.
  pub fn for_label(label: &str) -> Result<Self> {
    let wanted = label.trim().to_ascii_lowercase();
    let hyphenated = wanted.replace('_', "-");
    let unknown = || Error::UnknownEncoding(label.to_owned());

    let (encoding, bom) = match ALIASES.iter().find(|(name, ..)| *name == hyphenated) {
      Some((_, target, bom)) => {
        let encoding =
          Encoding::for_label_no_replacement(target.as_bytes()).ok_or_else(unknown)?;
        (encoding, *bom)
      }
      None => {
        let encoding = [wanted, hyphenated]
          .into_iter()
          .find_map(|candidate| Encoding::for_label_no_replacement(candidate.as_bytes()))
          .ok_or_else(unknown)?;
        (encoding, BomHandling::Keep)
      }
    };

    Ok(Self { encoding, bom, normalize_newlines: false })
  }

  pub fn with_newline_normalization(mut self, enabled: bool) -> Self {
    self.normalize_newlines = enabled;
    self
  }

  /// Canonical name of the resolved encoding, e.g. `UTF-8` or `Shift_JIS`.
  /// For BOM-sniffing labels this is the fallback encoding.
  pub fn name(&self) -> &'static str { self.encoding.name() }

  /// Decode `bytes`, returning the text and whether any replacement
  /// happened. Plain labels do not sniff a byte order mark, so a UTF-8 BOM
  /// under `utf-8` decodes to U+FEFF; `utf-8-sig` drops it and `utf-16`
  /// lets it choose the byte order.
  pub fn decode(&self, bytes: &[u8]) -> (String, bool) {
    let (text, had_errors) = match self.bom {
      BomHandling::Keep => self.encoding.decode_without_bom_handling(bytes),
      BomHandling::Remove => self.encoding.decode_with_bom_removal(bytes),
      BomHandling::Sniff => {
        let (text, _, had_errors) = self.encoding.decode(bytes);
        (text, had_errors)
      }
    };
    let text = if self.normalize_newlines && text.contains('\r') {
      text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
      text.into_owned()
    };
    (text, had_errors)
  }

  /// Read the whole file at `path` and decode it.
  pub async fn read_file(&self, path: &Path) -> io::Result<String> {
    let bytes = tokio::fs::read(path).await?;
    let (text, had_errors) = self.decode(&bytes);
    if had_errors {
      tracing::debug!(
        path = %path.display(),
        encoding = self.name(),
        "replaced undecodable bytes"
      );
    }
    Ok(text)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn resolves_common_labels() {
    assert_eq!(TextDecoder::for_label("utf-8").unwrap().name(), "UTF-8");
    assert_eq!(TextDecoder::for_label("UTF8").unwrap().name(), "UTF-8");
    assert_eq!(TextDecoder::for_label("utf_8").unwrap().name(), "UTF-8");
    assert_eq!(TextDecoder::for_label(" shift_jis ").unwrap().name(), "Shift_JIS");
    assert_eq!(TextDecoder::for_label("cp932").unwrap().name(), "Shift_JIS");
    assert_eq!(TextDecoder::for_label("euc_jp").unwrap().name(), "EUC-JP");
  }

  #[test]
  fn unknown_label_is_rejected() {
    assert!(matches!(
      TextDecoder::for_label("klingon"),
      Err(Error::UnknownEncoding(l)) if l == "klingon"
    ));
    // Maps to the replacement encoding, which would blank every file.
    assert!(TextDecoder::for_label("iso-2022-kr").is_err());
  }

  #[test]
  fn invalid_utf8_is_replaced() {
    let d = TextDecoder::for_label("utf-8").unwrap();
    let (text, had_errors) = d.decode(b"ab\xffcd");
    assert_eq!(text, "ab\u{FFFD}cd");
    assert!(had_errors);
  }

  #[test]
  fn shift_jis_round_trips() {
    let (bytes, _, _) = encoding_rs::SHIFT_JIS.encode("日記の本文");
    let d = TextDecoder::for_label("shift_jis").unwrap();
    let (text, had_errors) = d.decode(&bytes);
    assert_eq!(text, "日記の本文");
    assert!(!had_errors);
  }

  #[test]
  fn utf8_sig_strips_the_bom() {
    let d = TextDecoder::for_label("utf-8-sig").unwrap();
    assert_eq!(d.name(), "UTF-8");
    assert_eq!(d.decode(b"\xEF\xBB\xBFhi").0, "hi");
    assert_eq!(d.decode(b"hi").0, "hi");
    let upper = TextDecoder::for_label("UTF_8_SIG").unwrap();
    assert_eq!(upper.decode(b"\xEF\xBB\xBFhi").0, "hi");
  }

  #[test]
  fn utf16_follows_the_bom() {
    let d = TextDecoder::for_label("utf-16").unwrap();
    let (text, had_errors) = d.decode(&[0xFE, 0xFF, 0x00, 0x68, 0x00, 0x69]);
    assert_eq!(text, "hi");
    assert!(!had_errors);
    assert_eq!(d.decode(&[0xFF, 0xFE, 0x68, 0x00, 0x69, 0x00]).0, "hi");
    // No BOM: little-endian.
    assert_eq!(d.decode(&[0x68, 0x00, 0x69, 0x00]).0, "hi");
  }

  #[test]
  fn bom_is_kept() {
    let d = TextDecoder::for_label("utf-8").unwrap();
    let (text, _) = d.decode(b"\xEF\xBB\xBFhi");
    assert_eq!(text, "\u{FEFF}hi");
  }

  #[test]
  fn newlines_untouched_by_default() {
    let d = TextDecoder::for_label("utf-8").unwrap();
    assert_eq!(d.decode(b"a\r\nb\rc").0, "a\r\nb\rc");
  }

  #[test]
  fn newlines_normalized_when_enabled() {
    let d = TextDecoder::for_label("utf-8")
      .unwrap()
      .with_newline_normalization(true);
    assert_eq!(d.decode(b"a\r\nb\rc\n").0, "a\nb\nc\n");
  }

  #[tokio::test]
  async fn read_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let d = TextDecoder::for_label("utf-8").unwrap();
    let err = d.read_file(&dir.path().join("nope.md")).await.unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
  }

  #[tokio::test]
  async fn read_file_directory_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let d = TextDecoder::for_label("utf-8").unwrap();
    assert!(d.read_file(dir.path()).await.is_err());
  }
}
