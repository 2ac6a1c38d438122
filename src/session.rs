use std::fs;
use std::io::Write;
use std::path::PathBuf;

use crate::instruction::{self, Instruction};
use crate::memory::{self, ImageRow, Memory};
use crate::simulator::Simulator;
use crate::trace::Tracer;
use color_eyre::eyre::{Result, WrapErr};
use log::*;

/// Everything one run needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Instruction stream, one record per line
    pub input: PathBuf,
    /// Optional initial memory image
    pub image: Option<PathBuf>,
    /// Snapshot after loading the image and after every instruction
    pub verbose: bool,
}

/// Reads and parses the instruction stream. Failing to read it is fatal.
///
/// Bytes that are not UTF-8 only spoil the line they are on.
pub fn read_instructions(config: &Config) -> Result<Vec<Instruction>> {
    let bytes = fs::read(&config.input)
        .wrap_err_with(|| format!("Failed to read instructions from {}", config.input.display()))?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(instruction::parse::Parser::new(&text).parse())
}

/// Reads and parses the memory image, if one was requested. An unreadable
/// image leaves memory zeroed.
pub fn read_image(config: &Config) -> Vec<ImageRow> {
    let path = match &config.image {
        Some(path) => path,
        None => return Vec::new(),
    };

    match fs::read(path) {
        Ok(bytes) => memory::parse::Parser::new(&String::from_utf8_lossy(&bytes)).parse(),
        Err(err) => {
            warn!(
                "Failed to read memory image {}: {}; starting from zeroed memory",
                path.display(),
                err
            );
            Vec::new()
        }
    }
}

/// Runs one session: trace lines and snapshots go to `out`
pub fn run<W: Write>(config: &Config, out: W) -> Result<Simulator> {
    // nothing is traced unless the whole stream could be read
    let instructions = read_instructions(config)?;
    let rows = read_image(config);

    info!(
        "Loaded {} instructions and {} image rows",
        instructions.len(),
        rows.len()
    );

    let mut sim = Simulator::new(Memory::with_image(&rows));
    let mut tracer = Tracer::new(out, config.verbose);

    if config.image.is_some() {
        tracer.checkpoint(&sim.snapshot())?;
    }

    sim.run(&instructions, &mut tracer)?;

    Ok(sim)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::Register;
    use color_eyre::eyre::Result;
    use std::path::Path;

    /// A file in the temp dir, removed again on drop
    struct Fixture(PathBuf);

    impl Fixture {
        fn new(name: &str, contents: impl AsRef<[u8]>) -> Result<Self> {
            let path = std::env::temp_dir().join(format!(
                "cachesim-{}-{}",
                std::process::id(),
                name
            ));
            fs::write(&path, contents)?;
            Ok(Self(path))
        }

        fn path(&self) -> &Path {
            &self.0
        }
    }

    impl Drop for Fixture {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    fn config(input: &Path, image: Option<&Path>, verbose: bool) -> Config {
        Config {
            input: input.to_path_buf(),
            image: image.map(Path::to_path_buf),
            verbose,
        }
    }

    #[test]
    fn test_missing_input_is_fatal() -> Result<()> {
        let missing = std::env::temp_dir().join("cachesim-does-not-exist.txt");
        let mut out = Vec::new();

        let err = run(&config(&missing, None, true), &mut out).unwrap_err();

        assert!(err.to_string().contains("Failed to read instructions"));
        assert!(out.is_empty());

        Ok(())
    }

    #[test]
    fn test_image_seeds_memory() -> Result<()> {
        let input = Fixture::new("seed-input.txt", "LDR 1 0010\nBAD LINE\nLDR 2 0012\n")?;
        let image = Fixture::new(
            "seed-image.txt",
            "0010: 34 12 78 56 00 00 00 00 00 00 00 00 00 00 00 00\n",
        )?;
        let mut out = Vec::new();

        let sim = run(&config(input.path(), Some(image.path()), false), &mut out)?;

        assert_eq!(sim.registers().read(Register::R1), 0x1234);
        assert_eq!(sim.registers().read(Register::R2), 0x5678);

        let out = String::from_utf8(out)?;
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("LDR 1 0010 000 2 0 M 1234"));
        assert_eq!(lines.next(), Some("LDR 2 0012 000 2 2 H 5678"));
        assert_eq!(lines.next(), Some("R0: 0000   R1: 1234   R2: 5678   R3: 0000"));
        assert_eq!(out.matches("V M Tag").count(), 1);

        Ok(())
    }

    #[test]
    fn test_unreadable_image_degrades() -> Result<()> {
        let input = Fixture::new("degrade-input.txt", "LDR 1 0010\n")?;
        let missing = std::env::temp_dir().join("cachesim-no-image.txt");
        let mut out = Vec::new();

        let sim = run(&config(input.path(), Some(&missing), false), &mut out)?;

        assert_eq!(sim.registers().read(Register::R1), 0);
        assert!(String::from_utf8(out)?.starts_with("LDR 1 0010 000 2 0 M 0000\n"));

        Ok(())
    }

    #[test]
    fn test_verbose_snapshots_after_image() -> Result<()> {
        let input = Fixture::new("verbose-input.txt", "LDR 0 0000\n")?;
        let image = Fixture::new(
            "verbose-image.txt",
            "0000: ff 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00\n",
        )?;
        let mut out = Vec::new();

        run(&config(input.path(), Some(image.path()), true), &mut out)?;

        let out = String::from_utf8(out)?;
        // after the image, after the instruction, at the end
        assert_eq!(out.matches("V M Tag").count(), 3);
        assert!(out.starts_with("R0: 0000"));
        assert!(out.contains("\nLDR 0 0000 000 0 0 M 00ff\n"));

        let mut out = Vec::new();
        run(&config(input.path(), None, true), &mut out)?;
        let out = String::from_utf8(out)?;
        assert_eq!(out.matches("V M Tag").count(), 2);
        assert!(out.starts_with("LDR 0 0000"));

        Ok(())
    }

    #[test]
    fn test_non_utf8_input_line_is_skipped() -> Result<()> {
        let input = Fixture::new(
            "lossy-input.txt",
            &b"LDR 0 0000\n\xff\xfe garbage\nLDR 1 0008\n"[..],
        )?;
        let mut out = Vec::new();

        run(&config(input.path(), None, false), &mut out)?;

        let out = String::from_utf8(out)?;
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some("LDR 0 0000 000 0 0 M 0000"));
        assert_eq!(lines.next(), Some("LDR 1 0008 000 1 0 M 0000"));
        assert_eq!(lines.next(), Some("R0: 0000   R1: 0000   R2: 0000   R3: 0000"));

        Ok(())
    }

    #[test]
    fn test_non_utf8_image_row_keeps_good_rows() -> Result<()> {
        let input = Fixture::new("lossy-image-input.txt", "LDR 0 0000\n")?;
        let image = Fixture::new(
            "lossy-image.txt",
            &b"0000: 11 22 00 00 00 00 00 00 00 00 00 00 00 00 00 00\n\xff\n"[..],
        )?;
        let mut out = Vec::new();

        let sim = run(&config(input.path(), Some(image.path()), false), &mut out)?;

        assert_eq!(sim.registers().read(Register::R0), 0x2211);

        Ok(())
    }
}
