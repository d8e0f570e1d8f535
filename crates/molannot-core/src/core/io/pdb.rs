use crate::core::chem::elements::{element_from_atom_name, element_from_autodock_type, normalize_element};
use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::residue::ResidueKey;
use crate::core::models::system::{GraphError, MolecularSystem, MolecularSystemBuilder};
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::debug;

/// Written instead of an empty atom list so downstream viewers still load the file.
const EMPTY_PLACEHOLDER: &str =
    "ATOM      1  X   XXX             0.000   0.000   0.000                       X";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// Number of PDBQT torsion remarks (`between atoms` lines naming an active `A` torsion).
    pub rotatable_bonds: usize,
    /// HEADER/TITLE/COMPND/REMARK lines, verbatim.
    pub header_lines: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: PdbParseErrorKind,
    },
    #[error("Invalid bond graph: {0}")]
    Graph(#[from] GraphError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must reach column 54)")]
    LineTooShort,
    #[error("CONECT line has no bonded atom field (must reach column 16)")]
    ConectTooShort,
    #[error("CONECT record references atom serial {serial}, which was not loaded")]
    UnknownSerial { serial: usize },
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("").trim()
}

fn parse_int<T: std::str::FromStr>(
    line: &str,
    line_num: usize,
    (start, end): (usize, usize),
) -> Result<T, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

fn parse_float(line: &str, line_num: usize, (start, end): (usize, usize)) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// AutoDock type of a PDBQT atom line: a charge in columns 71-76, a blank
/// column 77 and a left-aligned type from column 78. Plain PDB lines keep their
/// element symbol in columns 77-78 and yield `None`.
fn autodock_type(line: &str) -> Option<&str> {
    let has_charge = slice_and_trim(line, 70, 76).parse::<f64>().is_ok();
    let column_77_blank = line.get(76..77).is_none_or(|c| c.trim().is_empty());
    let ad_type = slice_and_trim(line, 77, 79);
    (has_charge && column_77_blank && !ad_type.is_empty()).then_some(ad_type)
}

fn parse_atom_line(line: &str, line_num: usize) -> Result<Atom, PdbError> {
    if line.len() < 54 {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::LineTooShort,
        });
    }

    let serial: usize = parse_int(line, line_num, (6, 11))?;
    let name = slice_and_trim(line, 12, 16);
    if name.is_empty() {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::MissingRequiredField {
                columns: "13-16".into(),
            },
        });
    }
    // The alternate-location column is read as part of the residue name.
    let res_name = slice_and_trim(line, 16, 20);
    let chain_id = line.get(21..22).and_then(|s| s.chars().next()).unwrap_or(' ');
    let res_seq: isize = parse_int(line, line_num, (22, 26))?;
    let x = parse_float(line, line_num, (30, 38))?;
    let y = parse_float(line, line_num, (38, 46))?;
    let z = parse_float(line, line_num, (46, 54))?;

    // Segment identifiers share these columns in plain PDB files.
    let partial_charge = slice_and_trim(line, 70, 76).parse().unwrap_or(0.0);

    let from_columns = match autodock_type(line) {
        Some(ad_type) => element_from_autodock_type(ad_type),
        None => normalize_element(slice_and_trim(line, 76, 78)),
    };
    let element = from_columns
        .or_else(|| element_from_atom_name(name))
        .ok_or_else(|| PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::MissingRequiredField {
                columns: "77-78".into(),
            },
        })?;

    let residue = ResidueKey::new(res_name, res_seq, chain_id);
    Ok(Atom::new(name, &element, &residue, Point3::new(x, y, z))
        .with_serial(serial)
        .with_partial_charge(partial_charge))
}

struct ConectRecord {
    line: usize,
    serial: usize,
    partners: Vec<usize>,
}

fn parse_conect_line(line: &str, line_num: usize) -> Result<ConectRecord, PdbError> {
    if line.len() < 16 {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::ConectTooShort,
        });
    }
    let serial = parse_int(line, line_num, (6, 11))?;
    let mut partners = Vec::with_capacity(4);
    for columns in [(11, 16), (16, 21), (21, 26), (26, 31)] {
        if !slice_and_trim(line, columns.0, columns.1).is_empty() {
            partners.push(parse_int(line, line_num, columns)?);
        }
    }
    Ok(ConectRecord {
        line: line_num,
        serial,
        partners,
    })
}

fn format_atom_line(atom: &Atom) -> String {
    let record = if atom.role.is_protein() { "ATOM" } else { "HETATM" };
    let name = if atom.name.len() < 4 && atom.element.len() == 1 {
        format!(" {}", atom.name)
    } else {
        atom.name.clone()
    };
    format!(
        "{:<6}{:>5} {:<4}{:>4} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}    {:>6.3}{:>2}",
        record,
        atom.index,
        name,
        atom.res_name,
        atom.chain_id,
        atom.res_seq,
        atom.position.x,
        atom.position.y,
        atom.position.z,
        1.0,
        0.0,
        atom.partial_charge,
        atom.element,
    )
}

/// PDB and PDBQT reader/writer.
///
/// Atoms are re-indexed from 1 in file order. CONECT records are resolved
/// through the atom serial numbers once the whole file has been read and are
/// declared one-directionally, exactly as written. Serials need not be
/// contiguous or ordered: gaps and renumbered blocks resolve to whichever atom
/// carries the serial, and a serial no atom carries fails the load. On output
/// atoms are renumbered by index, so a written file reads back with the same
/// indices.
pub struct PdbFile;

impl MolecularFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut builder = MolecularSystemBuilder::new();
        let mut metadata = PdbMetadata::default();
        let mut conect_records = Vec::new();

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            if line.contains("between atoms") && line.contains(" A ") {
                metadata.rotatable_bonds += 1;
            }

            match slice_and_trim(&line, 0, 6) {
                "ATOM" | "HETATM" => {
                    builder.add_atom(parse_atom_line(&line, line_num)?);
                }
                "CONECT" => conect_records.push(parse_conect_line(&line, line_num)?),
                "HEADER" | "TITLE" | "COMPND" | "REMARK" => metadata.header_lines.push(line.clone()),
                "END" => break,
                _ => {}
            }
        }

        for record in conect_records {
            let resolve = |serial: usize| {
                builder.index_of_serial(serial).ok_or(PdbError::Parse {
                    line: record.line,
                    kind: PdbParseErrorKind::UnknownSerial { serial },
                })
            };
            let atom = resolve(record.serial)?;
            let partners = record
                .partners
                .iter()
                .map(|&serial| resolve(serial))
                .collect::<Result<Vec<_>, _>>()?;
            builder.declare_neighbors(atom, &partners)?;
        }

        debug!(
            atoms = builder.atom_count(),
            rotatable_bonds = metadata.rotatable_bonds,
            "Loaded PDB structure"
        );
        Ok((builder.build(), metadata))
    }

    fn write_to(
        system: &MolecularSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for line in &metadata.header_lines {
            writeln!(writer, "{}", line)?;
        }

        if system.is_empty() {
            writeln!(writer, "{}", EMPTY_PLACEHOLDER)?;
        }
        for atom in system.atoms_iter() {
            writeln!(writer, "{}", format_atom_line(atom))?;
        }

        for atom in system.atoms_iter() {
            for chunk in atom.neighbors().chunks(4) {
                write!(writer, "CONECT{:>5}", atom.index)?;
                for partner in chunk {
                    write!(writer, "{:>5}", partner)?;
                }
                writeln!(writer)?;
            }
        }

        writeln!(writer, "END")?;
        Ok(())
    }

    fn write_system_to(
        system: &MolecularSystem,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let metadata = PdbMetadata {
            header_lines: vec!["REMARK   Generated by molannot".to_string()],
            ..Default::default()
        };
        Self::write_to(system, &metadata, writer)
    }
}
