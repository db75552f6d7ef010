mod commands;
mod terminal;

use commands::{CommandLine, Commands, OutputArgs, devices, inventory};
use hostledger_common::config::{Config, Source};
use hostledger_common::network::subnet::Subnet;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose);
    print::banner(commands.no_banner);

    match commands.command {
        Commands::Devices => {
            print::header("capture devices");
            devices::devices()
        }
        Commands::Capture { interface, output } => {
            print::header("starting live capture");
            let cfg = config(commands.verbose, commands.no_banner, output);
            inventory::inventory(Source::Live { device: interface }, &cfg).await
        }
        Commands::Read { file, net, mask, output } => {
            print::header("reading capture file");
            let subnet = match (net, mask) {
                (Some(net), Some(mask)) => Some(Subnet::new(net, mask)?),
                _ => None,
            };
            let cfg = config(commands.verbose, commands.no_banner, output);
            inventory::inventory(Source::File { path: file, subnet }, &cfg).await
        }
    }
}

fn config(verbose: u8, no_banner: bool, output: OutputArgs) -> Config {
    Config {
        verbose,
        no_banner,
        frame_limit: output.count,
        out_file: output.write,
        csv: output.csv,
    }
}
