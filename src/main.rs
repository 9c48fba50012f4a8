use std::env;
use std::fs;
use std::process;

use tabsynth::{
    load_impulse_response, load_instrument_from_path, parse_sheet, render_sheet, write_wav,
    RenderOptions,
};

fn usage() -> ! {
    eprintln!("Usage: tabsynth <tab-file> -i <instrument.yaml> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -i, --instrument <file>   instrument definition (required)");
    eprintln!("  -o, --output <file>       output WAV file (default: out.wav)");
    eprintln!("      --ir <file>           impulse response WAV, enables convolution");
    eprintln!("      --no-convolution      disable convolution even with --ir");
    eprintln!("      --no-echo             disable the echo effect");
    eprintln!("      --echo-delay <s>      echo delay in seconds (default: 0.2)");
    eprintln!("      --echo-decay <f>      echo decay factor (default: 0.2)");
    eprintln!("      --pluck <p>           pluck position 0..1 (default: 0.7)");
    eprintln!("      --sample-rate <n>     output sample rate (default: 44100)");
    process::exit(1);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
    }

    let mut tab_path: Option<&String> = None;
    let mut instrument_path: Option<&String> = None;
    let mut output_path = "out.wav".to_string();
    let mut ir_path: Option<&String> = None;
    let mut no_convolution = false;
    let mut options = RenderOptions::default();

    let mut i = 1;
    while i < args.len() {
        let arg = &args[i];
        match arg.as_str() {
            "-i" | "--instrument" => instrument_path = Some(flag_value(&args, &mut i)),
            "-o" | "--output" => output_path = flag_value(&args, &mut i).clone(),
            "--ir" => ir_path = Some(flag_value(&args, &mut i)),
            "--no-convolution" => no_convolution = true,
            "--no-echo" => options.apply_echo = false,
            "--echo-delay" => {
                options.echo_delay = parse_number(flag_value(&args, &mut i), "--echo-delay");
            }
            "--echo-decay" => {
                options.echo_decay = parse_number(flag_value(&args, &mut i), "--echo-decay");
            }
            "--pluck" => {
                options.pluck_position = parse_number(flag_value(&args, &mut i), "--pluck");
            }
            "--sample-rate" => {
                options.sample_rate =
                    parse_number(flag_value(&args, &mut i), "--sample-rate") as u32;
            }
            _ if arg.starts_with('-') => {
                eprintln!("Unknown option: {arg}");
                usage();
            }
            _ => {
                if tab_path.is_some() {
                    eprintln!("Unexpected argument: {arg}");
                    usage();
                }
                tab_path = Some(arg);
            }
        }
        i += 1;
    }

    let Some(tab_path) = tab_path else { usage() };
    let Some(instrument_path) = instrument_path else {
        eprintln!("An instrument definition is required (-i <file>)");
        usage();
    };

    let source = match fs::read_to_string(tab_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading tab '{tab_path}': {e}");
            process::exit(1);
        }
    };

    let sheet = match parse_sheet(&source) {
        Ok(sheet) => sheet,
        Err(e) => {
            eprintln!("Error parsing tab: {e}");
            process::exit(1);
        }
    };

    let instrument = match load_instrument_from_path(instrument_path) {
        Ok(instrument) => instrument,
        Err(e) => {
            eprintln!("Error loading instrument '{instrument_path}': {e}");
            process::exit(1);
        }
    };

    if let Some(ir_path) = ir_path {
        match load_impulse_response(ir_path) {
            Ok(ir) => {
                options.impulse_response = Some(ir);
                options.apply_convolution = !no_convolution;
            }
            Err(e) => {
                eprintln!("Error loading impulse response '{ir_path}': {e}");
                process::exit(1);
            }
        }
    }

    eprintln!("Rendering '{}' by '{}'...", sheet.title, sheet.author);
    let signal = match render_sheet(&instrument, &sheet, &options) {
        Ok(signal) => signal,
        Err(e) => {
            eprintln!("Synthesis error: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = write_wav(&output_path, &signal, options.sample_rate) {
        eprintln!("Error writing '{output_path}': {e}");
        process::exit(1);
    }
    eprintln!(
        "Wrote {:.2} s of audio to {output_path}",
        signal.len() as f64 / options.sample_rate as f64
    );
}

/// The argument following a flag, or the usage message if it is missing.
fn flag_value<'a>(args: &'a [String], i: &mut usize) -> &'a String {
    *i += 1;
    args.get(*i).unwrap_or_else(|| usage())
}

fn parse_number(value: &str, flag: &str) -> f64 {
    match value.parse() {
        Ok(v) => v,
        Err(_) => {
            eprintln!("Invalid value for {flag}: {value}");
            process::exit(1);
        }
    }
}
