//! Example: Check the default port range and display socket owners.

use devport_core::domain::PortRange;
use devport_core::{PortScanner, PortService, TcpProbe};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let range = PortRange::new(3130, 3139);
    println!("Checking ports {}...\n", range);

    let service = PortService::new(TcpProbe::new(), PortScanner::new());
    let owners = service.find_processes_in_range(range).await;

    println!("{:<6} {:<6} {:<8} {:<20}", "PORT", "STATE", "PID", "PROCESS");
    println!("{}", "-".repeat(44));

    for port in range.iter() {
        if !service.is_port_in_use(port).await {
            println!("{:<6} {:<6}", port, "free");
            continue;
        }

        match owners.iter().find(|o| o.port == port) {
            Some(owner) => println!(
                "{:<6} {:<6} {:<8} {:<20}",
                port,
                "busy",
                owner.pid,
                owner.process_name.chars().take(20).collect::<String>()
            ),
            None => println!("{:<6} {:<6} {:<8}", port, "busy", "?"),
        }
    }

    match service.find_available_port(range).await {
        Some(port) => println!("\nNext free port: {}", port),
        None => println!("\nNo free port in {}", range),
    }
}
