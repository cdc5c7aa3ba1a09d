use std::fs::OpenOptions;
use std::io::{self, BufWriter, Read, Write};

use binpack_codec::{PackConfig, Packer, PrefixWidth};
use tracing::debug;

use crate::cmd::{open_input, PrefixArgs};
use crate::exit::{io_error, pack_error, CliResult, SUCCESS};

pub fn run(args: PrefixArgs, config: &PackConfig) -> CliResult<i32> {
    let mut payload = Vec::new();
    open_input(&args.input)?
        .read_to_end(&mut payload)
        .map_err(|err| io_error(&format!("failed reading {}", args.input.display()), err))?;

    let width = PrefixWidth::from(args.width);
    let sink: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .append(args.append)
                .truncate(!args.append)
                .open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            Box::new(file)
        }
        None => Box::new(io::stdout().lock()),
    };

    let mut sink = write_record(BufWriter::new(sink), width, &payload, config)?;
    sink.flush()
        .map_err(|err| io_error("failed flushing output", err))?;

    debug!(
        size = payload.len(),
        %width,
        byte_order = %config.byte_order,
        "wrote length-prefixed record"
    );
    Ok(SUCCESS)
}

fn write_record<W: Write>(
    sink: W,
    width: PrefixWidth,
    payload: &[u8],
    config: &PackConfig,
) -> CliResult<W> {
    Packer::with_config(sink, config.clone())
        .push_bytes_with_prefix(width, payload)
        .finish()
        .map_err(|err| pack_error("failed writing record", err))
}

#[cfg(test)]
mod tests {
    use binpack_codec::ByteOrder;

    use super::*;
    use crate::exit::DATA_INVALID;

    #[test]
    fn writes_prefixed_record() {
        let out = write_record(Vec::new(), PrefixWidth::U16, b"Hi", &PackConfig::default()).unwrap();
        assert_eq!(out, [2, 0, b'H', b'i']);
    }

    #[test]
    fn honours_big_endian() {
        let cfg = PackConfig::with_byte_order(ByteOrder::Big);
        let out = write_record(Vec::new(), PrefixWidth::U32, b"x", &cfg).unwrap();
        assert_eq!(out, [0, 0, 0, 1, b'x']);
    }

    #[test]
    fn oversized_payload_is_data_invalid() {
        let payload = vec![0u8; u16::MAX as usize + 1];
        let err = write_record(Vec::new(), PrefixWidth::U16, &payload, &PackConfig::default())
            .unwrap_err();
        assert_eq!(err.code, DATA_INVALID);
    }
}
