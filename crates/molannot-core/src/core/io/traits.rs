use crate::core::models::system::MolecularSystem;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Common interface for molecular file formats.
///
/// Implementors only provide the reader/writer based methods; the path based
/// variants open the file and delegate.
pub trait MolecularFile {
    /// Format-specific data that does not belong in the system itself.
    type Metadata;

    type Error: Error + From<io::Error>;

    /// Reads a molecular system from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if a record is malformed, a bond record references an
    /// atom that was never loaded, or the underlying reader fails.
    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error>;

    /// Writes a molecular system together with its metadata.
    fn write_to(
        system: &MolecularSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    /// Writes a molecular system with default metadata.
    fn write_system_to(
        system: &MolecularSystem,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    fn read_from_path<P: AsRef<Path>>(
        path: P,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from(&mut reader)
    }

    fn write_to_path<P: AsRef<Path>>(
        system: &MolecularSystem,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(system, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    fn write_system_to_path<P: AsRef<Path>>(
        system: &MolecularSystem,
        path: P,
    ) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_system_to(system, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
