//! CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use dtm_keys::flags::element_flags;
use dtm_keys::{new_element_key, KeyCodec};

use crate::output::{self, OutputFormat};

/// dtm key converter - encode, decode, and convert element keys.
#[derive(Debug, Parser)]
#[command(name = "dtmkey")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format (plain or json).
    #[arg(long, global = true, default_value = "plain")]
    format: String,

    /// Reject mis-sized input instead of converting best-effort.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Generate a fresh element key.
    New(NewArgs),

    /// Prepend a flags prefix to a short key, producing a full key.
    Full(FullArgs),

    /// Strip the flags prefix from a full key.
    Short(ShortArgs),

    /// Derive the varint system ID from a full key.
    SystemId(SystemIdArgs),

    /// Combine a model ID and a full key into an xref key.
    Xref(XrefArgs),

    /// Split an xref key into its model URN and full key.
    Unxref(UnxrefArgs),

    /// Unpack a flat array of 20-byte short-key records.
    Unpack(UnpackArgs),

    /// Unpack a flat array of 40-byte xref-key records.
    UnpackXref(UnpackXrefArgs),

    /// Print a key as a dashed lowercase-hex GUID.
    Guid(GuidArgs),
}

#[derive(Debug, Args)]
struct NewArgs {
    /// Element kind (simple, room, level, stream, system, generic-asset,
    /// ticket, family-type).
    #[arg(long, default_value = "simple")]
    kind: String,

    /// Raw flags value in hex (overrides --kind).
    #[arg(long)]
    flags: Option<String>,
}

#[derive(Debug, Args)]
struct FullArgs {
    /// Short key (web-safe base64, 20 bytes).
    key: String,

    /// Mark the element as logical rather than physical.
    #[arg(long)]
    logical: bool,
}

#[derive(Debug, Args)]
struct ShortArgs {
    /// Full key (web-safe base64, 24 bytes).
    key: String,
}

#[derive(Debug, Args)]
struct SystemIdArgs {
    /// Full key (web-safe base64, 24 bytes).
    key: String,
}

#[derive(Debug, Args)]
struct XrefArgs {
    /// Model ID (web-safe base64, optionally `urn:adsk.dtm:`-prefixed).
    model: String,

    /// Full key (web-safe base64, 24 bytes).
    key: String,
}

#[derive(Debug, Args)]
struct UnxrefArgs {
    /// Xref key (web-safe base64, 40 bytes).
    key: String,
}

#[derive(Debug, Args)]
struct UnpackArgs {
    /// Packed short-key records (web-safe base64).
    packed: String,

    /// Emit 24-byte full keys instead of short keys.
    #[arg(long)]
    full: bool,

    /// Flags value to prepend when emitting full keys: logical.
    #[arg(long)]
    logical: bool,
}

#[derive(Debug, Args)]
struct UnpackXrefArgs {
    /// Packed xref-key records (web-safe base64).
    packed: String,
}

#[derive(Debug, Args)]
struct GuidArgs {
    /// Key of any shape (web-safe base64).
    key: String,
}

/// One split xref entry.
#[derive(Debug, Serialize)]
struct XrefEntry {
    model: String,
    key: String,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let format = OutputFormat::parse(&self.format)?;
        let codec = if self.strict {
            KeyCodec::strict()
        } else {
            KeyCodec::lenient()
        };

        match self.command {
            Commands::New(args) => new_key(args, format),
            Commands::Full(args) => {
                let full = codec.to_full_key(&args.key, args.logical)?;
                output::print_value(&full, format);
                Ok(())
            }
            Commands::Short(args) => {
                let short = codec.to_short_key(&args.key)?;
                output::print_value(&short, format);
                Ok(())
            }
            Commands::SystemId(args) => {
                let system_id = codec.to_system_id(&args.key)?;
                output::print_value(&system_id, format);
                Ok(())
            }
            Commands::Xref(args) => {
                let xref = codec.to_xref_key(&args.model, &args.key)?;
                output::print_value(&xref, format);
                Ok(())
            }
            Commands::Unxref(args) => {
                let (model, key) = codec.from_xref_key(&args.key)?;
                match format {
                    OutputFormat::Plain => {
                        println!("{model}");
                        println!("{key}");
                    }
                    OutputFormat::Json => output::print_json(&XrefEntry { model, key }),
                }
                Ok(())
            }
            Commands::Unpack(args) => {
                let keys = codec.from_short_key_array(&args.packed, args.full, args.logical)?;
                output::print_list(&keys, format);
                Ok(())
            }
            Commands::UnpackXref(args) => {
                let (models, keys) = codec.from_xref_key_array(&args.packed)?;
                let entries: Vec<XrefEntry> = models
                    .into_iter()
                    .zip(keys)
                    .map(|(model, key)| XrefEntry { model, key })
                    .collect();
                match format {
                    OutputFormat::Plain => {
                        for entry in &entries {
                            println!("{} {}", entry.model, entry.key);
                        }
                    }
                    OutputFormat::Json => output::print_json(&entries),
                }
                Ok(())
            }
            Commands::Guid(args) => {
                let guid = codec.to_element_guid(&args.key)?;
                output::print_value(&guid, format);
                Ok(())
            }
        }
    }
}

fn new_key(args: NewArgs, format: OutputFormat) -> Result<()> {
    let flags = match args.flags {
        Some(hex) => {
            let trimmed = hex.trim_start_matches("0x");
            u32::from_str_radix(trimmed, 16)
                .with_context(|| format!("invalid hex flags value '{hex}'"))?
        }
        None => kind_flags(&args.kind)?,
    };

    output::print_value(&new_element_key(flags), format);
    Ok(())
}

fn kind_flags(kind: &str) -> Result<u32> {
    match kind {
        "simple" => Ok(element_flags::SIMPLE_ELEMENT),
        "room" => Ok(element_flags::ROOM),
        "family-type" => Ok(element_flags::FAMILY_TYPE),
        "level" => Ok(element_flags::LEVEL),
        "stream" => Ok(element_flags::STREAM),
        "system" => Ok(element_flags::SYSTEM),
        "generic-asset" => Ok(element_flags::GENERIC_ASSET),
        "ticket" => Ok(element_flags::TICKET),
        other => anyhow::bail!(
            "unknown element kind '{other}' (expected simple, room, family-type, \
             level, stream, system, generic-asset, or ticket)"
        ),
    }
}
