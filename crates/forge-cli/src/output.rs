//! Template artifact writing.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use forge_core::{BlockAssembly, MinedBlock};

/// Write the three-part template artifact.
///
/// Line 1 is the 80-byte header as 160 hex characters, line 2 the coinbase
/// raw bytes as hex, and every following line one txid in final block
/// order - the coinbase id leads that list rather than being repeated.
pub fn write_template(
    path: &Path,
    mined: &MinedBlock,
    assembly: &BlockAssembly,
) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);

    writeln!(out, "{}", mined.header_hex())?;
    writeln!(out, "{}", assembly.coinbase.raw_hex())?;
    for txid in &assembly.txids {
        writeln!(out, "{}", hex::encode(txid))?;
    }

    out.flush()
}
