use crate::core::io::traits::MolecularFile;
use crate::core::models::atom::Atom;
use crate::core::models::system::MolecularSystem;
use nalgebra::Point3;
use std::io::{self, BufRead, Write};
use thiserror::Error;

const MAX_SERIAL: usize = 100_000;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PdbMetadata {
    /// Records preceding the coordinates (HEADER, TITLE, REMARK, CRYST1, ...), verbatim.
    pub header_lines: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: PdbParseErrorKind },
    #[error("Missing required record: {0}")]
    MissingRecord(String),
}

#[derive(Debug, Error, PartialEq)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: String, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: String, value: String },
    #[error("Required field in columns {columns} is empty")]
    MissingRequiredField { columns: String },
    #[error("Line is too short for ATOM/HETATM record (must be at least 54 chars)")]
    LineTooShort,
}

/// Kind of a coordinate-section line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum PdbRecord {
    Atom(AtomRecord),
    Ter,
    EndModel,
    End,
    Other,
}

/// One parsed `ATOM`/`HETATM` line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AtomRecord {
    pub name: String,
    pub res_name: String,
    pub chain_id: char,
    pub res_seq: isize,
    pub insertion_code: Option<char>,
    pub position: Point3<f64>,
    pub occupancy: f64,
    pub b_factor: f64,
    pub element: String,
    pub is_hetero: bool,
}

fn slice_and_trim(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end).unwrap_or("").trim()
}

fn column_char(line: &str, index: usize) -> Option<char> {
    line.get(index..index + 1)
        .and_then(|s| s.chars().next())
        .filter(|c| *c != ' ')
}

fn parse_float(line: &str, line_num: usize, start: usize, end: usize) -> Result<f64, PdbError> {
    let value = slice_and_trim(line, start, end);
    value.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            columns: format!("{}-{}", start + 1, end),
            value: value.into(),
        },
    })
}

/// Classifies a line and parses it if it is an atom record.
pub(crate) fn parse_record(line: &str, line_num: usize) -> Result<PdbRecord, PdbError> {
    let record_type = slice_and_trim(line, 0, 6);
    match record_type {
        "ATOM" | "HETATM" => parse_atom_record(line, line_num, record_type == "HETATM")
            .map(PdbRecord::Atom),
        "TER" => Ok(PdbRecord::Ter),
        "ENDMDL" => Ok(PdbRecord::EndModel),
        "END" => Ok(PdbRecord::End),
        _ => Ok(PdbRecord::Other),
    }
}

fn parse_atom_record(line: &str, line_num: usize, is_hetero: bool) -> Result<AtomRecord, PdbError> {
    if line.len() < 54 {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::LineTooShort,
        });
    }

    let name = slice_and_trim(line, 12, 16);
    if name.is_empty() {
        return Err(PdbError::Parse {
            line: line_num,
            kind: PdbParseErrorKind::MissingRequiredField {
                columns: "13-16".into(),
            },
        });
    }

    let res_seq_str = slice_and_trim(line, 22, 26);
    let res_seq: isize = res_seq_str.parse().map_err(|_| PdbError::Parse {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            columns: "23-26".into(),
            value: res_seq_str.into(),
        },
    })?;

    let x = parse_float(line, line_num, 30, 38)?;
    let y = parse_float(line, line_num, 38, 46)?;
    let z = parse_float(line, line_num, 46, 54)?;

    let occupancy = slice_and_trim(line, 54, 60).parse().unwrap_or(1.0);
    let b_factor = slice_and_trim(line, 60, 66).parse().unwrap_or(0.0);

    Ok(AtomRecord {
        name: name.to_string(),
        res_name: slice_and_trim(line, 17, 20).to_string(),
        chain_id: column_char(line, 21).unwrap_or(' '),
        res_seq,
        insertion_code: column_char(line, 26),
        position: Point3::new(x, y, z),
        occupancy,
        b_factor,
        element: slice_and_trim(line, 76, 78).to_string(),
        is_hetero,
    })
}

fn format_atom_name(name: &str) -> String {
    if name.len() >= 4 {
        name.chars().take(4).collect()
    } else {
        format!(" {:<3}", name)
    }
}

struct RecordWriter<'w, W: Write> {
    writer: &'w mut W,
    next_serial: usize,
}

impl<'w, W: Write> RecordWriter<'w, W> {
    fn new(writer: &'w mut W) -> Self {
        Self {
            writer,
            next_serial: 1,
        }
    }

    fn take_serial(&mut self) -> usize {
        let serial = self.next_serial % MAX_SERIAL;
        self.next_serial += 1;
        serial
    }

    fn write_system(&mut self, system: &MolecularSystem) -> Result<(), PdbError> {
        for (chain_id, chain) in system.chains_iter() {
            let mut last_residue = None;
            for atom_id in system.chain_atom_ids(chain_id) {
                let Some(atom) = system.atom(atom_id) else {
                    continue;
                };
                let Some(residue) = system.residue(atom.residue_id) else {
                    continue;
                };
                let serial = self.take_serial();
                writeln!(
                    self.writer,
                    "{:<6}{:>5} {:<4} {:>3} {}{:>4}{}   {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
                    if atom.is_hetero { "HETATM" } else { "ATOM" },
                    serial,
                    format_atom_name(&atom.name),
                    residue.name,
                    chain.id,
                    residue.number,
                    residue.insertion_code.unwrap_or(' '),
                    atom.position.x,
                    atom.position.y,
                    atom.position.z,
                    atom.occupancy,
                    atom.b_factor,
                    atom.element,
                )?;
                last_residue = Some(residue);
            }

            if let Some(residue) = last_residue {
                let serial = self.take_serial();
                writeln!(
                    self.writer,
                    "TER   {:>5}      {:>3} {}{:>4}{}",
                    serial,
                    residue.name,
                    chain.id,
                    residue.number,
                    residue.insertion_code.unwrap_or(' '),
                )?;
            }
        }
        Ok(())
    }
}

pub struct PdbFile;

impl PdbFile {
    /// Writes several systems into one file, one after another.
    ///
    /// Serial numbers run continuously across systems and every chain is closed
    /// with a `TER` record, so a reader that numbers chains sequentially sees each
    /// system's chains as distinct chains even when identifiers repeat.
    pub fn write_systems_to<'a>(
        systems: impl IntoIterator<Item = &'a MolecularSystem>,
        writer: &mut impl Write,
    ) -> Result<(), PdbError> {
        let mut records = RecordWriter::new(writer);
        for system in systems {
            records.write_system(system)?;
        }
        writeln!(records.writer, "END")?;
        Ok(())
    }
}

impl MolecularFile for PdbFile {
    type Metadata = PdbMetadata;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
    ) -> Result<(MolecularSystem, Self::Metadata), Self::Error> {
        let mut system = MolecularSystem::new();
        let mut metadata = PdbMetadata::default();
        let mut atom_count = 0usize;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            match parse_record(&line, line_num)? {
                PdbRecord::Atom(record) => {
                    let chain_id = system.add_chain(record.chain_id);
                    let residue_id = system
                        .add_residue(
                            chain_id,
                            record.res_seq,
                            record.insertion_code,
                            &record.res_name,
                        )
                        .ok_or_else(|| {
                            PdbError::MissingRecord(format!("chain '{}'", record.chain_id))
                        })?;

                    let mut atom = Atom::new(&record.name, residue_id, record.position);
                    atom.occupancy = record.occupancy;
                    atom.b_factor = record.b_factor;
                    atom.element = record.element;
                    atom.is_hetero = record.is_hetero;
                    system.add_atom_to_residue(residue_id, atom);
                    atom_count += 1;
                }
                PdbRecord::Ter => {}
                PdbRecord::EndModel | PdbRecord::End => break,
                PdbRecord::Other => {
                    if atom_count == 0 && !line.trim().is_empty() && !line.starts_with("MODEL") {
                        metadata.header_lines.push(line);
                    }
                }
            }
        }

        if atom_count == 0 {
            return Err(PdbError::MissingRecord("ATOM/HETATM records".into()));
        }
        Ok((system, metadata))
    }

    fn write_to(
        system: &MolecularSystem,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        for line in &metadata.header_lines {
            writeln!(writer, "{}", line)?;
        }
        Self::write_systems_to([system], writer)
    }

    fn write_system_to(
        system: &MolecularSystem,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error> {
        let metadata = PdbMetadata {
            header_lines: vec!["REMARK   1 GENERATED BY RINGSTOICH".to_string()],
        };
        Self::write_to(system, &metadata, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const DIMER: &str = "\
HEADER    TEST DIMER
REMARK   1 TWO GLYCINES
ATOM      1  N   GLY A   1       0.000   0.000   0.000  1.00 10.00           N
ATOM      2  CA  GLY A   1       1.458   0.000   0.000  1.00 11.00           C
ATOM      3  C   GLY A   1       2.009   1.420   0.000  0.50 12.00           C
TER       4      GLY A   1
ATOM      5  N   GLY B   1      10.000   0.000   0.000  1.00 10.00           N
ATOM      6  CA  GLY B   1      11.458   0.000   0.000  1.00 11.00           C
ATOM      7  C   GLY B   1      12.009   1.420   0.000  1.00 12.00           C
TER       8      GLY B   1
END
";

    fn read(text: &str) -> Result<(MolecularSystem, PdbMetadata), PdbError> {
        PdbFile::read_from(&mut Cursor::new(text))
    }

    #[test]
    fn read_parses_chains_residues_and_atoms() {
        let (system, metadata) = read(DIMER).unwrap();

        assert_eq!(system.atom_count(), 6);
        assert_eq!(system.chains_iter().count(), 2);
        assert_eq!(metadata.header_lines.len(), 2);

        let chain_b = system.find_chain_by_id('B').unwrap();
        let atoms = system.chain_atom_ids(chain_b);
        let c = system.atom(atoms[2]).unwrap();
        assert_eq!(c.name, "C");
        assert_eq!(c.element, "C");
        assert_eq!(c.b_factor, 12.0);
        assert!((c.position - Point3::new(12.009, 1.42, 0.0)).norm() < 1e-9);
        assert_eq!(system.residue(c.residue_id).unwrap().name, "GLY");
    }

    #[test]
    fn read_stops_after_first_model() {
        let text = "\
MODEL        1
ATOM      1  CA  GLY A   1       0.000   0.000   0.000  1.00  0.00           C
ENDMDL
MODEL        2
ATOM      1  CA  GLY A   1       5.000   0.000   0.000  1.00  0.00           C
ENDMDL
";
        let (system, metadata) = read(text).unwrap();
        assert_eq!(system.atom_count(), 1);
        assert!(metadata.header_lines.is_empty());
    }

    #[test]
    fn read_accepts_overflowed_serial_columns() {
        let text = "\
ATOM  A0000  CA  GLY A   1       0.000   0.000   0.000  1.00  0.00           C
ATOM  *****  CA  GLY A   2       3.800   0.000   0.000  1.00  0.00           C
";
        let (system, _) = read(text).unwrap();
        assert_eq!(system.atom_count(), 2);
    }

    #[test]
    fn read_reports_invalid_coordinate_with_line_number() {
        let text = "ATOM      1  CA  GLY A   1       0.000   abc     0.000  1.00  0.00           C\n";
        match read(text) {
            Err(PdbError::Parse { line, kind }) => {
                assert_eq!(line, 1);
                assert!(matches!(kind, PdbParseErrorKind::InvalidFloat { .. }));
            }
            other => panic!("expected parse error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn read_rejects_truncated_atom_line() {
        let text = "ATOM      1  CA  GLY A   1       0.000\n";
        assert!(matches!(
            read(text),
            Err(PdbError::Parse {
                kind: PdbParseErrorKind::LineTooShort,
                ..
            })
        ));
    }

    #[test]
    fn read_without_atoms_is_missing_record() {
        assert!(matches!(
            read("HEADER    EMPTY\nEND\n"),
            Err(PdbError::MissingRecord(_))
        ));
    }

    #[test]
    fn written_system_reads_back_identically() {
        let (system, metadata) = read(DIMER).unwrap();
        let mut buffer = Vec::new();
        PdbFile::write_to(&system, &metadata, &mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("HEADER    TEST DIMER\n"));
        assert!(text.trim_end().ends_with("END"));

        let (reread, _) = read(&text).unwrap();
        assert_eq!(reread.atom_count(), system.atom_count());
        for chain in ['A', 'B'] {
            let original = system.chain_atom_ids(system.find_chain_by_id(chain).unwrap());
            let copy = reread.chain_atom_ids(reread.find_chain_by_id(chain).unwrap());
            assert_eq!(original.len(), copy.len());
            for (a, b) in original.iter().zip(&copy) {
                let a = system.atom(*a).unwrap();
                let b = reread.atom(*b).unwrap();
                assert_eq!(a.name, b.name);
                assert!((a.position - b.position).norm() < 1e-3);
                assert_eq!(a.occupancy, b.occupancy);
            }
        }
    }

    #[test]
    fn atom_lines_use_fixed_pdb_columns() {
        let (system, _) = read(DIMER).unwrap();
        let mut buffer = Vec::new();
        PdbFile::write_systems_to([&system], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let first = text.lines().next().unwrap();

        assert_eq!(&first[0..6], "ATOM  ");
        assert_eq!(&first[6..11], "    1");
        assert_eq!(&first[12..16], " N  ");
        assert_eq!(&first[17..20], "GLY");
        assert_eq!(&first[21..22], "A");
        assert_eq!(&first[22..26], "   1");
        assert_eq!(&first[30..38], "   0.000");
        assert_eq!(&first[76..78], " N");
    }

    #[test]
    fn write_systems_numbers_serials_continuously() {
        let (system, _) = read(DIMER).unwrap();
        let mut buffer = Vec::new();
        PdbFile::write_systems_to([&system, &system], &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();

        let ter_count = text.lines().filter(|l| l.starts_with("TER")).count();
        assert_eq!(ter_count, 4);
        let last_atom = text
            .lines()
            .filter(|l| l.starts_with("ATOM"))
            .last()
            .unwrap();
        assert_eq!(slice_and_trim(last_atom, 6, 11), "15");
    }
}
