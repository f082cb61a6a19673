mod listen;

use std::path::{Path, PathBuf};

use blendix::{Config, ParsePolicy, SerialCodec, Triple, Variant, MAX_SETS, WIRE_BUFFER_MAX_SIZE};
use clap::{Args, Parser, Subcommand};
use eyre::{Result, WrapErr};

#[derive(Parser, Clone, Debug)]
#[command(author, version, about)]
/// Encode and decode coordinate triples in the `x,y,z,...;text` serial format.
struct Cli {
    /// JSON file with default codec settings
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Clone, Debug)]
enum Command {
    /// Print the wire string for a list of triples
    Encode(EncodeArgs),
    /// Decode one received wire string
    Decode(DecodeArgs),
    /// Connect to a TCP serial bridge and decode every frame it sends
    Listen(ListenArgs),
}

#[derive(Args, Clone, Debug)]
struct EncodeArgs {
    /// Numeric representation of the triples ("int" or "float")
    #[arg(short, long)]
    variant: Option<Variant>,

    /// One transmit triple, repeat for more sets
    #[arg(short, long = "set", value_name = "X,Y,Z")]
    sets: Vec<String>,

    /// Label appended after the `;`
    #[arg(short, long)]
    text: Option<String>,

    /// Size of the output buffer, including the terminator byte
    ///
    /// Output that does not fit is cut off, the same way a device with this buffer size would.
    #[arg(short, long, default_value_t = WIRE_BUFFER_MAX_SIZE)]
    buffer_size: usize,
}

#[derive(Args, Clone, Debug)]
struct ReceiveArgs {
    /// Maximum number of triples to keep from each frame
    ///
    /// Defaults to the config file's value, or to every available set without a config file.
    #[arg(short, long)]
    rx_sets: Option<usize>,

    /// Reject frames containing tokens that are not numbers instead of reading them as 0
    #[arg(long)]
    strict: bool,
}

#[derive(Args, Clone, Debug)]
struct DecodeArgs {
    #[command(flatten)]
    receive: ReceiveArgs,

    /// Print the received triples as JSON
    #[arg(long)]
    json: bool,

    /// Received data, e.g. "10,20,30,40,50,60;"
    input: String,
}

#[derive(Args, Clone, Debug)]
struct ListenArgs {
    #[command(flatten)]
    receive: ReceiveArgs,

    /// Serial bridge to connect to
    #[arg(short, long, default_value = "127.0.0.1:9090")]
    tcp: String,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Encode(args) => encode(config.unwrap_or_default(), args),
        Command::Decode(args) => decode(config, args),
        Command::Listen(args) => {
            let codec = receiver(config, &args.receive)?;
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .wrap_err("Failed to start async runtime")?
                .block_on(listen::run(args.tcp, codec))
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Option<Config>> {
    let Some(path) = path else {
        return Ok(None);
    };

    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = serde_json::from_str(&raw)
        .wrap_err_with(|| format!("Invalid config file {}", path.display()))?;
    log::debug!("Loaded {:?} from {}", config, path.display());
    Ok(Some(config))
}

fn parse_triple(raw: &str, variant: Variant) -> Result<Triple> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    let [x, y, z] = parts[..] else {
        eyre::bail!("Expected three comma separated values, got '{}'", raw);
    };

    let triple = match variant {
        Variant::Int => Triple::from((x.parse::<i32>()?, y.parse::<i32>()?, z.parse::<i32>()?)),
        Variant::Float => Triple::from((x.parse::<f32>()?, y.parse::<f32>()?, z.parse::<f32>()?)),
    };
    Ok(triple)
}

fn transmitter(mut config: Config, args: &EncodeArgs) -> Result<SerialCodec> {
    if let Some(variant) = args.variant {
        config.variant = variant;
    }
    if let Some(text) = &args.text {
        config.text = text.clone();
    }
    config.tx_sets = args.sets.len();

    let mut codec = SerialCodec::from_config(&config)
        .wrap_err("Unable to configure transmit sets")?;
    for (i, raw) in args.sets.iter().enumerate() {
        let triple = parse_triple(raw, config.variant)
            .wrap_err_with(|| format!("Invalid set {}", i + 1))?;
        codec.set_coordinates(i + 1, triple)?;
    }
    Ok(codec)
}

fn encode(config: Config, args: EncodeArgs) -> Result<()> {
    let codec = transmitter(config, &args)?;
    let mut buffer = vec![0; args.buffer_size];
    let len = codec.encode_into(&mut buffer);
    println!("{}", String::from_utf8_lossy(&buffer[..len]));
    Ok(())
}

fn receiver(config: Option<Config>, args: &ReceiveArgs) -> Result<SerialCodec> {
    let from_file = config.is_some();
    let mut config = config.unwrap_or_default();
    // receive-only, give every set to the receive side
    config.tx_sets = 0;
    match args.rx_sets {
        Some(rx_sets) => config.rx_sets = rx_sets,
        None if !from_file => config.rx_sets = MAX_SETS,
        None => {}
    }
    if args.strict {
        config.parse_policy = ParsePolicy::Strict;
    }
    if config.rx_sets == 0 {
        log::warn!("Receive set count is 0, every frame will decode to nothing");
    }

    SerialCodec::from_config(&config).wrap_err("Unable to configure receive sets")
}

fn decode(config: Option<Config>, args: DecodeArgs) -> Result<()> {
    let mut codec = receiver(config, &args.receive)?;
    codec.parse_received(&args.input)
        .wrap_err_with(|| format!("Rejected input '{}'", args.input))?;

    if args.json {
        println!("{}", serde_json::to_string(codec.received_sets())?);
    } else {
        for set in codec.received_sets() {
            println!("{},{},{}", set.x, set.y, set.z);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mint::Vector3;

    fn receive_args(rx_sets: Option<usize>, strict: bool) -> ReceiveArgs {
        ReceiveArgs { rx_sets, strict }
    }

    fn encode_args(variant: Option<Variant>, sets: &[&str], text: Option<&str>) -> EncodeArgs {
        EncodeArgs {
            variant,
            sets: sets.iter().map(|s| s.to_string()).collect(),
            text: text.map(str::to_string),
            buffer_size: WIRE_BUFFER_MAX_SIZE,
        }
    }

    #[test]
    fn triples_follow_the_variant() {
        assert_eq!(
            parse_triple("1, -2,3", Variant::Int).unwrap(),
            Triple::Int(Vector3::from([1, -2, 3]))
        );
        assert_eq!(
            parse_triple("1.5,2,-0.25", Variant::Float).unwrap(),
            Triple::Float(Vector3::from([1.5, 2.0, -0.25]))
        );
        assert!(parse_triple("1.5,2,3", Variant::Int).is_err());
    }

    #[test]
    fn triples_need_three_numbers() {
        assert!(parse_triple("1,2", Variant::Int).is_err());
        assert!(parse_triple("1,2,3,4", Variant::Int).is_err());
        assert!(parse_triple("", Variant::Float).is_err());
        assert!(parse_triple("x,y,z", Variant::Float).is_err());
    }

    #[test]
    fn receiver_without_config_uses_every_set() {
        let mut codec = receiver(None, &receive_args(None, false)).unwrap();
        assert_eq!((codec.tx_sets(), codec.rx_sets()), (0, MAX_SETS));
        assert_eq!(codec.parse_policy(), ParsePolicy::Lenient);
        assert_eq!(codec.parse_received("10,20,30;"), Ok(1));
    }

    #[test]
    fn receiver_flags_override_config() {
        let config = Config { tx_sets: 3, rx_sets: 2, ..Config::default() };

        let codec = receiver(Some(config.clone()), &receive_args(None, false)).unwrap();
        assert_eq!((codec.tx_sets(), codec.rx_sets()), (0, 2));

        let codec = receiver(Some(config), &receive_args(Some(4), true)).unwrap();
        assert_eq!(codec.rx_sets(), 4);
        assert_eq!(codec.parse_policy(), ParsePolicy::Strict);

        assert!(receiver(None, &receive_args(Some(MAX_SETS + 1), false)).is_err());
    }

    #[test]
    fn transmitter_merges_flags_into_config() {
        let config = Config { variant: Variant::Float, text: "file".to_string(), ..Config::default() };

        let codec = transmitter(config.clone(), &encode_args(None, &["1,2,3"], None)).unwrap();
        assert_eq!(codec.to_wire_string(), "1.00,2.00,3.00;file");

        let args = encode_args(Some(Variant::Int), &["1,2,3", "4,5,6"], Some("Hi"));
        let codec = transmitter(config, &args).unwrap();
        assert_eq!(codec.to_wire_string(), "1,2,3,4,5,6;Hi");
    }

    #[test]
    fn transmitter_rejects_bad_sets() {
        let too_many = ["0,0,0"; MAX_SETS + 1];
        assert!(transmitter(Config::default(), &encode_args(None, &too_many, None)).is_err());

        let config = Config { rx_sets: MAX_SETS, ..Config::default() };
        assert!(transmitter(config, &encode_args(None, &["1,2,3"], None)).is_err());

        assert!(transmitter(Config::default(), &encode_args(None, &["1,2"], None)).is_err());
    }
}
