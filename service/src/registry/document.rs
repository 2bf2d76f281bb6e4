//! XML codec for the registry document
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <config>
//!   <mapping>
//!     <map hash="9f86d0...">
//!       <json>data/items.bytes</json>
//!       <excel>items.xlsx</excel>
//!     </map>
//!   </mapping>
//! </config>
//! ```

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use sheetsync_core::{RegistryEntry, Result, SyncError};
use std::path::{Path, PathBuf};

const ROOT: &str = "config";
const MAPPING: &str = "mapping";
const MAP: &str = "map";
const DATA_PATH: &str = "json";
const SPREADSHEET: &str = "excel";
const HASH: &str = "hash";

#[derive(Default)]
struct PartialEntry {
    data_path: Option<String>,
    spreadsheet_name: Option<String>,
    hash: Option<String>,
}

#[derive(Clone, Copy)]
enum Field {
    DataPath,
    Spreadsheet,
}

/// Parse the document text into entries in document order.
///
/// `source` is only used for error messages.
pub(crate) fn parse(source: &Path, xml: &str) -> Result<Vec<RegistryEntry>> {
    let err = |message: String| SyncError::registry(source, message);

    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut entries = Vec::new();
    let mut in_mapping = false;
    let mut current: Option<PartialEntry> = None;
    let mut field: Option<Field> = None;
    let mut text = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                name if name == MAPPING.as_bytes() => in_mapping = true,
                name if in_mapping && name == MAP.as_bytes() => {
                    let mut partial = PartialEntry::default();
                    for attr in e.attributes() {
                        let attr = attr.map_err(|e| err(format!("bad attribute: {e}")))?;
                        if attr.key.as_ref() == HASH.as_bytes() {
                            let value = attr
                                .unescape_value()
                                .map_err(|e| err(format!("bad hash attribute: {e}")))?;
                            partial.hash = Some(value.into_owned());
                        }
                    }
                    current = Some(partial);
                }
                name if current.is_some() && name == DATA_PATH.as_bytes() => {
                    field = Some(Field::DataPath);
                    text.clear();
                }
                name if current.is_some() && name == SPREADSHEET.as_bytes() => {
                    field = Some(Field::Spreadsheet);
                    text.clear();
                }
                _ => {}
            },
            Ok(Event::Text(t)) if field.is_some() => {
                let value = t
                    .unescape()
                    .map_err(|e| err(format!("bad text content: {e}")))?;
                text.push_str(&value);
            }
            Ok(Event::CData(c)) if field.is_some() => {
                text.push_str(&String::from_utf8_lossy(&c));
            }
            Ok(Event::End(e)) => match e.name().as_ref() {
                name if name == DATA_PATH.as_bytes() || name == SPREADSHEET.as_bytes() => {
                    if let (Some(f), Some(partial)) = (field.take(), current.as_mut()) {
                        let value = std::mem::take(&mut text);
                        match f {
                            Field::DataPath => partial.data_path = Some(value),
                            Field::Spreadsheet => partial.spreadsheet_name = Some(value),
                        }
                    }
                }
                name if name == MAP.as_bytes() => {
                    if let Some(partial) = current.take() {
                        entries.push(finish(partial).map_err(err)?);
                    }
                }
                name if name == MAPPING.as_bytes() => in_mapping = false,
                _ => {}
            },
            Ok(Event::Empty(e)) if in_mapping && e.name().as_ref() == MAP.as_bytes() => {
                return Err(err(format!(
                    "empty <{MAP}> element at byte {}",
                    reader.buffer_position()
                )));
            }
            Ok(Event::Eof) => {
                if current.is_some() {
                    return Err(err(format!("unterminated <{MAP}> element")));
                }
                break;
            }
            Ok(_) => {}
            Err(e) => {
                return Err(err(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
        }
    }

    Ok(entries)
}

fn finish(partial: PartialEntry) -> std::result::Result<RegistryEntry, String> {
    let data_path = partial
        .data_path
        .filter(|p| !p.is_empty())
        .ok_or_else(|| format!("<{MAP}> without a <{DATA_PATH}> path"))?;
    let spreadsheet_name = partial
        .spreadsheet_name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| format!("<{MAP}> for {data_path} without an <{SPREADSHEET}> name"))?;
    Ok(RegistryEntry {
        data_path: PathBuf::from(data_path),
        spreadsheet_name,
        last_digest: partial.hash.filter(|h| !h.is_empty()),
    })
}

/// Render entries as a complete document.
pub(crate) fn render<'a>(
    target: &Path,
    entries: impl IntoIterator<Item = &'a RegistryEntry>,
) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(target, &mut writer, Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    emit(target, &mut writer, Event::Start(BytesStart::new(ROOT)))?;
    emit(target, &mut writer, Event::Start(BytesStart::new(MAPPING)))?;

    for entry in entries {
        let mut map = BytesStart::new(MAP);
        if let Some(hash) = &entry.last_digest {
            map.push_attribute((HASH, hash.as_str()));
        }
        emit(target, &mut writer, Event::Start(map))?;
        emit_text_element(target, &mut writer, DATA_PATH, &entry.data_path.to_string_lossy())?;
        emit_text_element(target, &mut writer, SPREADSHEET, &entry.spreadsheet_name)?;
        emit(target, &mut writer, Event::End(BytesEnd::new(MAP)))?;
    }

    emit(target, &mut writer, Event::End(BytesEnd::new(MAPPING)))?;
    emit(target, &mut writer, Event::End(BytesEnd::new(ROOT)))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn emit(target: &Path, writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| SyncError::registry(target, format!("cannot render: {e}")))
}

fn emit_text_element(
    target: &Path,
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    text: &str,
) -> Result<()> {
    emit(target, writer, Event::Start(BytesStart::new(name)))?;
    emit(target, writer, Event::Text(BytesText::new(text)))?;
    emit(target, writer, Event::End(BytesEnd::new(name)))
}
