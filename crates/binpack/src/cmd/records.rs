use std::io::BufReader;

use binpack_codec::{PackConfig, PrefixWidth, Unpacker};
use tracing::{debug, info};

use crate::cmd::{open_input, RecordsArgs};
use crate::exit::{pack_error, CliResult, SUCCESS};
use crate::output::{OutputFormat, RecordPrinter};

pub fn run(args: RecordsArgs, format: OutputFormat, config: &PackConfig) -> CliResult<i32> {
    let source = BufReader::new(open_input(&args.input)?);
    let width = PrefixWidth::from(args.width);
    let mut unpacker = Unpacker::with_config(source, config.clone());
    let mut printer = RecordPrinter::new(format, width.to_string());

    let count = walk_records(&mut unpacker, width, args.count, |index, offset, payload| {
        printer.record(index, offset, payload)
    })?;
    printer.finish();

    info!(records = count, %width, "done");
    Ok(SUCCESS)
}

/// Visit each record until a clean end of input (or `limit` records).
///
/// Input ending inside a prefix or a payload is an error.
fn walk_records<R, F>(
    unpacker: &mut Unpacker<R>,
    width: PrefixWidth,
    limit: Option<usize>,
    mut visit: F,
) -> CliResult<usize>
where
    R: std::io::Read,
    F: FnMut(usize, u64, &[u8]),
{
    let mut index = 0usize;
    let mut offset = 0u64;
    while limit.is_none_or(|limit| index < limit) {
        let len = match unpacker.shift_len(width) {
            Ok(len) => len,
            Err(err) if err.is_clean_eof() => break,
            Err(err) => return Err(pack_error(&format!("record {index} prefix"), err)),
        };
        let payload = unpacker
            .shift_bytes(len)
            .map_err(|err| pack_error(&format!("record {index} payload"), err))?;

        debug!(index, offset, size = payload.len(), "record");
        visit(index, offset, &payload);

        offset += (width.size() + payload.len()) as u64;
        index += 1;
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use binpack_codec::Packer;

    use super::*;
    use crate::exit::DATA_INVALID;

    fn stream(width: PrefixWidth, payloads: &[&[u8]]) -> Vec<u8> {
        let mut packer = Packer::new(Vec::new());
        for payload in payloads {
            packer = packer.push_bytes_with_prefix(width, payload);
        }
        packer.finish().unwrap()
    }

    fn collect(wire: &[u8], width: PrefixWidth, limit: Option<usize>) -> CliResult<Vec<(u64, Vec<u8>)>> {
        let mut seen = Vec::new();
        let mut unpacker = Unpacker::new(wire);
        walk_records(&mut unpacker, width, limit, |_, offset, payload| {
            seen.push((offset, payload.to_vec()))
        })?;
        Ok(seen)
    }

    #[test]
    fn walks_all_records() {
        let wire = stream(PrefixWidth::U16, &[b"one", b"", b"three"]);
        let seen = collect(&wire, PrefixWidth::U16, None).unwrap();
        assert_eq!(
            seen,
            vec![
                (0, b"one".to_vec()),
                (5, Vec::new()),
                (7, b"three".to_vec())
            ]
        );
    }

    #[test]
    fn empty_input_has_no_records() {
        assert!(collect(&[], PrefixWidth::U32, None).unwrap().is_empty());
    }

    #[test]
    fn limit_stops_early() {
        let wire = stream(PrefixWidth::U64, &[b"a", b"b", b"c"]);
        assert_eq!(collect(&wire, PrefixWidth::U64, Some(2)).unwrap().len(), 2);
    }

    #[test]
    fn truncated_payload_is_data_invalid() {
        let mut wire = stream(PrefixWidth::U32, &[b"hello"]);
        wire.truncate(6);
        let err = collect(&wire, PrefixWidth::U32, None).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.to_string().contains("record 0 payload"));
    }

    #[test]
    fn truncated_prefix_is_data_invalid() {
        let mut wire = stream(PrefixWidth::U32, &[b"ok"]);
        wire.push(0x01);
        let err = collect(&wire, PrefixWidth::U32, None).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.to_string().contains("record 1 prefix"));
    }

    #[test]
    fn payload_with_empty_body_after_prefix_is_an_error() {
        let err = collect(&[3, 0], PrefixWidth::U16, None).unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }
}
