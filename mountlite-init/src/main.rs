//! Entry point for the mountlite boot agent.
//!
//! Runs the automount sequence exactly once, before anything that depends
//! on mounted filesystems, and exits nonzero on the first failure.

#[cfg(not(target_os = "linux"))]
compile_error!("mountlite-init is Linux-only; build with a Linux target");

#[cfg(target_os = "linux")]
use std::path::PathBuf;

#[cfg(target_os = "linux")]
use anyhow::Context;
#[cfg(target_os = "linux")]
use clap::Parser;
#[cfg(target_os = "linux")]
use mountlite::services::{NixMountService, StaticInitrdRegistry, TarballExtractor};
#[cfg(target_os = "linux")]
use mountlite::{AutomountConfig, AutomountDriver, RootVolume, RootfsConfig, VolumeTable};
#[cfg(target_os = "linux")]
use tracing::info;

/// Mounts configured volumes at startup, root filesystem first
#[cfg(target_os = "linux")]
#[derive(Parser, Debug)]
#[command(version, about = "mountlite boot agent - mounts configured volumes at startup")]
struct InitArgs {
    /// Volume table entry: <src>:<mountpoint>:<driver>[:<flags>[:<opts>]]
    ///
    /// Entries are mounted in the order given, after the root filesystem.
    /// Flags accept decimal, 0x-prefixed hex, and 0-prefixed octal.
    #[arg(long = "fstab", value_name = "ENTRY")]
    fstab: Vec<String>,

    /// Number of slots in the volume table
    #[arg(long, default_value_t = mountlite::config::DEFAULT_TABLE_CAPACITY)]
    fstab_size: usize,

    /// Root device (leave empty for sourceless root filesystems)
    #[arg(long, default_value = "")]
    root_device: String,

    /// Root filesystem driver; leave unset to skip mounting "/"
    #[arg(long, default_value = "")]
    root_driver: String,

    /// Root mount flags
    #[arg(long, default_value_t = 0)]
    root_flags: u64,

    /// Root mount options
    #[arg(long)]
    root_options: Option<String>,

    /// Initrd image file, loaded into memory at startup
    ///
    /// May be given multiple times; only the first image is ever mounted.
    #[arg(long = "initrd", value_name = "FILE")]
    initrd: Vec<PathBuf>,

    /// Disable root automounting entirely
    #[arg(long)]
    skip_root: bool,
}

#[cfg(target_os = "linux")]
fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber - respects RUST_LOG env var
    if let Err(e) = tracing_subscriber::fmt()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
    {
        eprintln!("[ERROR] Failed to initialize tracing: {}", e);
        // Continue anyway - logging failure shouldn't stop the mounts
    }

    let args = InitArgs::parse();

    let mut table = VolumeTable::new(args.fstab_size);
    for entry in &args.fstab {
        table.push(entry.clone())?;
    }

    let rootfs = if args.skip_root {
        RootfsConfig::Disabled
    } else {
        RootfsConfig::Declared(RootVolume {
            device: args.root_device,
            driver: args.root_driver,
            flags: args.root_flags,
            options: args.root_options,
        })
    };

    let mut registry = StaticInitrdRegistry::new();
    for path in &args.initrd {
        let image = std::fs::read(path)
            .with_context(|| format!("failed to read initrd image {}", path.display()))?;
        info!("Loaded initrd image {} ({} bytes)", path.display(), image.len());
        registry.register(image);
    }

    let config = AutomountConfig { rootfs, table };
    let driver = AutomountDriver::new(&NixMountService, &TarballExtractor, &registry);

    driver.run(&config)?;
    info!("All configured volumes mounted");
    Ok(())
}
