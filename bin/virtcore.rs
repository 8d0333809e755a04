use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use virtcore::{
    cli::{styles::AnsiStyles, VirtcoreArgs},
    config::VmSpec,
    provision::Provisioner,
    utils, VirtcoreResult,
};

//--------------------------------------------------------------------------------------------------
// Functions: main
//--------------------------------------------------------------------------------------------------

#[tokio::main]
async fn main() -> ExitCode {
    let args = VirtcoreArgs::parse();
    init_tracing(args.verbose);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {}", "error:".error(), err);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: VirtcoreArgs) -> VirtcoreResult<()> {
    let spec = VmSpec::builder()
        .name(args.name)
        .disk_size(args.size)
        .memory_mib(args.memory)
        .num_vcpus(args.vcpus)
        .network(args.network)
        .build()?;

    let image_dir = utils::resolve_image_dir(args.image_dir);
    let provisioner = Provisioner::new(image_dir);
    let receipt = provisioner.provision(spec).await?;

    println!(
        "Empty VM '{}' created successfully with network: {}",
        receipt.get_name().as_str().valid(),
        receipt.get_network()
    );
    println!(
        "Disk image created at: {}",
        receipt.get_disk_path().display().to_string().literal()
    );

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
