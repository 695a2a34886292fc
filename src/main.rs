use clap::Parser;
use mkdtemp::temp_dir::maker::DEFAULT_MAX_ATTEMPTS;
use mkdtemp::{CreatedPath, Encoding, FileUrl, MakerConfig, MkdtempOptions, TempDirMaker, Template};
use std::io::{self, IsTerminal, Write};
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(about = "Create uniquely named temporary directories", long_about = None)]
#[clap(author, version)]
struct Args {
	/// Path prefix that six random characters are appended to
	template: String,

	/// Treat the template as a file: URL
	#[arg(long)]
	url: bool,

	/// Number of directories to create
	#[arg(short, long, default_value_t = 1)]
	count: u32,

	/// Encoding of the printed paths: utf8, latin1 or buffer (raw bytes)
	#[arg(short, long)]
	encoding: Option<Encoding>,

	/// Give up after this many name collisions
	#[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
	max_attempts: u32,
}

fn main() {
	init_tracing();

	tracing::info!(
		"{} v{} ({})",
		env!("CARGO_PKG_NAME"),
		env!("CARGO_PKG_VERSION"),
		env!("CARGO_PKG_LICENSE")
	);

	let args = Args::parse();

	match run(&args) {
		Ok(_) => (),
		Err(e) => {
			eprintln!("mkdtemp failed: {}", e);
			process::exit(1);
		}
	}
}

fn init_tracing() {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.with_ansi(io::stderr().is_terminal())
		.with_target(false)
		.init();
}

fn run(args: &Args) -> io::Result<()> {
	let template = if args.url {
		Template::from(FileUrl::parse(&args.template)?)
	} else {
		Template::from(args.template.as_str())
	};

	let maker = TempDirMaker::with_config(MakerConfig {
		max_attempts: args.max_attempts,
		..MakerConfig::default()
	});
	let options = args.encoding.map(MkdtempOptions::with_encoding);

	let mut stdout = io::stdout().lock();
	for _ in 0..args.count {
		match maker.create(template.clone(), options)? {
			CreatedPath::Text(path) => writeln!(stdout, "{path}")?,
			CreatedPath::Buffer(bytes) => {
				stdout.write_all(&bytes)?;
				stdout.write_all(b"\n")?;
			}
		}
	}
	stdout.flush()
}
