use std::{
    fs::File,
    io::{BufWriter, Write},
    str::FromStr,
};

use log::info;
use structopt::StructOpt;
use thiserror::Error;
use url::Url;

use wsdlgen_wsdl as wsdl;
use wsdl::{
    types::{AddressingVersion, BindingDescriptor, EnvelopeVersion},
    DrainOrder, Options,
};

#[derive(Debug, Error)]
enum Error {
    #[error("Error generating WSDL")]
    WsdlError(#[from] wsdl::Error),

    #[error("Error writing output")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy)]
struct Addressing(AddressingVersion);

impl FromStr for Addressing {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self(AddressingVersion::None)),
            "wsa10" => Ok(Self(AddressingVersion::WsAddressing10)),
            "wsa2004" => Ok(Self(AddressingVersion::WsAddressingAugust2004)),
            other => Err(format!(
                "unknown addressing version `{}` (expected none, wsa10 or wsa2004)",
                other
            )),
        }
    }
}

#[derive(StructOpt)]
struct Args {
    #[structopt(short, long, default_value = "./service.wsdl")]
    output: String,

    /// Address written into the service port.
    #[structopt(short, long)]
    base_url: Url,

    #[structopt(long)]
    binding_name: Option<String>,

    #[structopt(long)]
    soap12: bool,

    #[structopt(long)]
    addressing: Option<Addressing>,

    /// Keep draining type queues until every referenced type is defined.
    #[structopt(long)]
    fixed_point: bool,

    #[structopt(long, default_value = "2")]
    indent: usize,

    /// Path or URL of a JSON service description.
    input: String,
}

impl Args {
    fn binding(&self, description: &wsdl::ServiceDescription) -> BindingDescriptor {
        let mut binding = description
            .binding
            .clone()
            .unwrap_or_else(|| BindingDescriptor::basic_http(&description.contract));

        if let Some(name) = &self.binding_name {
            binding.name = name.clone();
        }

        if self.soap12 {
            binding.message_version.envelope = EnvelopeVersion::Soap12;
        }

        if let Some(Addressing(addressing)) = self.addressing {
            binding.message_version.addressing = addressing;
        }

        binding
    }

    fn options(&self, description: &wsdl::ServiceDescription) -> Options {
        let drain_order = if self.fixed_point {
            DrainOrder::FixedPoint
        } else {
            DrainOrder::ThreePhase
        };

        Options::new(self.base_url.clone())
            .with_binding(self.binding(description))
            .with_drain_order(drain_order)
            .with_indent(self.indent)
    }
}

#[paw::main]
fn main(args: Args) -> Result<(), Error> {
    env_logger::init();

    let description = wsdl::load(&args.input)?;
    let options = args.options(&description);

    let file = File::create(&args.output)?;
    let mut writer = wsdl::generate(
        &description.contract,
        &description.types,
        &options,
        BufWriter::new(file),
    )?;
    writer.flush()?;

    info!("wrote {}", args.output);
    Ok(())
}
