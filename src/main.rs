// SPDX-License-Identifier: MPL-2.0
use iris_lens::app::{self, Flags};

const USAGE: &str = "\
Usage: iris_lens [OPTIONS]

Options:
  --camera <DEVICE|FILE>   Capture device, or a video file replayed as a camera
  --catalog-url <URL>      Texture catalog endpoint
  --config-dir <DIR>       Directory holding settings.toml
  --data-dir <DIR>         Directory holding the face model and diagnostics
  -h, --help               Print this help
";

fn main() -> iced::Result {
    let mut args = pico_args::Arguments::from_env();

    if args.contains(["-h", "--help"]) {
        print!("{USAGE}");
        return Ok(());
    }

    let flags = match parse_flags(&mut args) {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("{err}\n\n{USAGE}");
            std::process::exit(2);
        }
    };

    let rest = args.finish();
    if !rest.is_empty() {
        eprintln!("Ignoring unexpected arguments: {rest:?}");
    }

    app::run(flags)
}

fn parse_flags(args: &mut pico_args::Arguments) -> Result<Flags, pico_args::Error> {
    Ok(Flags {
        camera: args.opt_value_from_str("--camera")?,
        catalog_url: args.opt_value_from_str("--catalog-url")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        data_dir: args.opt_value_from_str("--data-dir")?,
    })
}
