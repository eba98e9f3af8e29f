use uartlog_port::available_ports;

use crate::cmd::PortsArgs;
use crate::exit::{port_error, CliResult, SUCCESS};
use crate::output::{print_ports, OutputFormat};

pub fn run(_args: PortsArgs, format: OutputFormat) -> CliResult<i32> {
    let ports = available_ports().map_err(|err| port_error("port listing failed", err))?;
    print_ports(&ports, format);
    Ok(SUCCESS)
}
