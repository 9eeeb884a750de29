//! Example: A component bound to a simulated S7 PLC
//!
//! Run with: cargo run --example simulated_cell
//!
//! This example demonstrates:
//! - Sizing point tables and assigning addresses
//! - The connect gate
//! - Periodic batched reads driven by simulation steps
//! - Writing outputs on signal changes
//! - The disconnect-on-error policy

use std::collections::HashMap;
use std::time::Duration;

use s7_dio::{
    Component, ComponentConfig, Direction, Endpoint, Field, Host, ItemResult, MemoryArea,
    PointRegistry, PropertyChange, PropertyHandle, ReadRequest, ReadResponse, SignalChange,
    SignalHandle, SlotHandles, StatusCode, Transport, Trigger, WriteRequest,
};

/// In-memory PLC. Input byte 0 counts up on every read.
#[derive(Default)]
struct SimulatedPlc {
    open: bool,
    counter: u8,
    memory: HashMap<(MemoryArea, u16, u32), bool>,
    fail_after: Option<usize>,
    reads: usize,
}

impl Transport for SimulatedPlc {
    fn connect_to(&mut self, address: &str, rack: u16, slot: u16) -> Result<(), StatusCode> {
        println!("  [plc] session from {} (rack {}, slot {})", address, rack, slot);
        self.open = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.open = false;
    }

    fn connected(&self) -> bool {
        self.open
    }

    fn read_multi(&mut self, request: &ReadRequest) -> Result<ReadResponse, StatusCode> {
        self.reads += 1;
        if self.fail_after.is_some_and(|limit| self.reads > limit) {
            return Err(StatusCode::TCP_CONNECTION_RESET);
        }
        self.counter = self.counter.wrapping_add(1);
        Ok(request
            .items()
            .iter()
            .map(|item| {
                let value = match item.area {
                    MemoryArea::ProcessInputs if item.start < 8 => (self.counter >> item.start) & 1 == 1,
                    _ => self
                        .memory
                        .get(&(item.area, item.db_number, item.start))
                        .copied()
                        .unwrap_or(false),
                };
                ItemResult::ok(vec![u8::from(value)])
            })
            .collect())
    }

    fn write_area(&mut self, request: &WriteRequest) -> Result<(), StatusCode> {
        let item = request.item();
        let value = request.data().first().copied().unwrap_or(0) != 0;
        println!("  [plc] write {:?} start {} = {}", item.area, item.start, value);
        self.memory.insert((item.area, item.db_number, item.start), value);
        Ok(())
    }
}

/// Host that keeps properties and prints what the component does.
#[derive(Default)]
struct ConsoleHost {
    next: u64,
    properties: HashMap<u64, String>,
    labels: HashMap<u64, String>,
}

impl PointRegistry for ConsoleHost {
    fn attach_point(&mut self, direction: Direction, index: usize, default_address: &str) -> SlotHandles {
        self.next += 1;
        self.properties.insert(self.next, default_address.to_string());
        self.labels.insert(self.next, format!("{} {}", direction, index));
        SlotHandles {
            signal: SignalHandle(self.next),
            property: PropertyHandle(self.next),
        }
    }

    fn detach_point(&mut self, _direction: Direction, _index: usize, handles: SlotHandles) {
        self.properties.remove(&handles.property.0);
        self.labels.remove(&handles.signal.0);
    }

    fn address_text(&self, property: PropertyHandle) -> Option<String> {
        self.properties.get(&property.0).cloned()
    }
}

impl Host for ConsoleHost {
    fn set_signal(&mut self, signal: SignalHandle, value: bool) {
        let label = self.labels.get(&signal.0).map(String::as_str).unwrap_or("?");
        println!("  [host] {} = {}", label, u8::from(value));
    }

    fn set_status(&mut self, status: &str) {
        println!("  [host] status: {}", status);
    }

    fn set_read_only(&mut self, _field: Field, _read_only: bool) {}

    fn set_trigger_visible(&mut self, _trigger: Trigger, _visible: bool) {}

    fn reset_connect_trigger(&mut self) {}
}

fn main() -> s7_dio::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    // =========================================================================
    // Configure
    // =========================================================================

    println!("=== Configure ===\n");

    let plc = SimulatedPlc {
        fail_after: Some(4),
        ..SimulatedPlc::default()
    };
    let config = ComponentConfig::new("demo_cell")
        .with_endpoint(Endpoint::new("192.168.0.10", 0, 1))
        .with_read_interval(Duration::from_millis(100));
    let mut component = Component::new(plc, config);
    let mut host = ConsoleHost::default();

    component.on_load(0, 0, &mut host)?;
    component.on_property_changed(PropertyChange::PointCount(Direction::Input, 3), &mut host)?;
    component.on_property_changed(PropertyChange::PointCount(Direction::Output, 1), &mut host)?;

    for (index, text) in ["I0.0", "I0.1", "I0.2"].into_iter().enumerate() {
        component.on_property_changed(
            PropertyChange::SlotAddress(Direction::Input, index, text),
            &mut host,
        )?;
    }

    // Outputs may not target process inputs.
    let rejected = component.on_property_changed(
        PropertyChange::SlotAddress(Direction::Output, 0, "I1.0"),
        &mut host,
    );
    println!("DO 0 = I1.0 -> {:?}", rejected.err());
    println!("can connect: {}", component.coordinator().can_connect());

    component.on_property_changed(
        PropertyChange::SlotAddress(Direction::Output, 0, "DB1.DBX0.0"),
        &mut host,
    )?;
    println!("can connect: {}", component.coordinator().can_connect());

    // =========================================================================
    // Run
    // =========================================================================

    println!("\n=== Run ===\n");

    component.on_signal_changed(SignalChange::Trigger(Trigger::Connect, true), &mut host)?;

    for step in 0..10u64 {
        let now = Duration::from_millis(step * 50);
        match component.on_simulation_step(now, &mut host) {
            Ok(0) => {}
            Ok(count) => println!("t={:?}: {} inputs updated", now, count),
            Err(e) => {
                println!("t={:?}: {}", now, e);
                break;
            }
        }
        if step == 3 {
            component.on_signal_changed(SignalChange::Point(Direction::Output, 0, true), &mut host)?;
        }
    }

    println!(
        "\nsession state after run: {:?}",
        component.coordinator().state()
    );

    Ok(())
}
