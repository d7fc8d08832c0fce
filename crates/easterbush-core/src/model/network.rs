use crate::error::{Error, Result};
use crate::model::components::{Bus, Generator, Link, Load, Store};
use crate::series::Snapshots;

/// The assembled energy system: a set of buses joined by links, with
/// loads, generators, and stores attached, all sharing one clock.
///
/// Component names are unique per kind and every attachment must
/// reference an existing bus; violations are rejected at add time so the
/// dispatch engine can trust the model.
#[derive(Debug, Clone)]
pub struct Network {
    snapshots: Snapshots,
    buses: Vec<Bus>,
    loads: Vec<Load>,
    generators: Vec<Generator>,
    links: Vec<Link>,
    stores: Vec<Store>,
}

impl Network {
    #[must_use]
    pub fn new(snapshots: Snapshots) -> Self {
        Self {
            snapshots,
            buses: Vec::new(),
            loads: Vec::new(),
            generators: Vec::new(),
            links: Vec::new(),
            stores: Vec::new(),
        }
    }

    #[must_use]
    pub const fn snapshots(&self) -> &Snapshots {
        &self.snapshots
    }

    fn require_bus(&self, component: &str, bus: &str) -> Result<()> {
        if self.bus(bus).is_none() {
            return Err(Error::UnknownBus {
                component: component.to_string(),
                bus: bus.to_string(),
            });
        }
        Ok(())
    }

    fn require_unique(existing: bool, kind: &'static str, name: &str) -> Result<()> {
        if existing {
            return Err(Error::Duplicate {
                kind,
                name: name.to_string(),
            });
        }
        Ok(())
    }

    pub fn add_bus(&mut self, bus: Bus) -> Result<()> {
        Self::require_unique(self.bus(&bus.name).is_some(), "bus", &bus.name)?;
        self.buses.push(bus);
        Ok(())
    }

    /// Attach a load. Its demand series must already be aligned to the
    /// network clock.
    pub fn add_load(&mut self, load: Load) -> Result<()> {
        Self::require_unique(self.load(&load.name).is_some(), "load", &load.name)?;
        self.require_bus(&load.name, &load.bus)?;
        if !load.demand.is_aligned_to(&self.snapshots) {
            return Err(Error::InvalidData(format!(
                "demand series of load {} is not aligned to the network snapshots",
                load.name
            )));
        }
        self.loads.push(load);
        Ok(())
    }

    pub fn add_generator(&mut self, generator: Generator) -> Result<()> {
        Self::require_unique(
            self.generator(&generator.name).is_some(),
            "generator",
            &generator.name,
        )?;
        self.require_bus(&generator.name, &generator.bus)?;
        if !generator.marginal_cost.is_aligned_to(&self.snapshots) {
            return Err(Error::InvalidData(format!(
                "marginal cost series of generator {} is not aligned to the network snapshots",
                generator.name
            )));
        }
        self.generators.push(generator);
        Ok(())
    }

    pub fn add_link(&mut self, link: Link) -> Result<()> {
        Self::require_unique(self.link(&link.name).is_some(), "link", &link.name)?;
        self.require_bus(&link.name, &link.bus0)?;
        self.require_bus(&link.name, &link.bus1)?;
        self.links.push(link);
        Ok(())
    }

    pub fn add_store(&mut self, store: Store) -> Result<()> {
        Self::require_unique(self.store(&store.name).is_some(), "store", &store.name)?;
        self.require_bus(&store.name, &store.bus)?;
        self.stores.push(store);
        Ok(())
    }

    #[must_use]
    pub fn bus(&self, name: &str) -> Option<&Bus> {
        self.buses.iter().find(|b| b.name == name)
    }

    #[must_use]
    pub fn load(&self, name: &str) -> Option<&Load> {
        self.loads.iter().find(|l| l.name == name)
    }

    #[must_use]
    pub fn generator(&self, name: &str) -> Option<&Generator> {
        self.generators.iter().find(|g| g.name == name)
    }

    #[must_use]
    pub fn link(&self, name: &str) -> Option<&Link> {
        self.links.iter().find(|l| l.name == name)
    }

    #[must_use]
    pub fn store(&self, name: &str) -> Option<&Store> {
        self.stores.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn buses(&self) -> &[Bus] {
        &self.buses
    }

    #[must_use]
    pub fn loads(&self) -> &[Load] {
        &self.loads
    }

    #[must_use]
    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    #[must_use]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    #[must_use]
    pub fn stores(&self) -> &[Store] {
        &self.stores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::carrier::Carrier;
    use crate::series::Series;
    use chrono::{TimeZone, Utc};

    fn snaps() -> Snapshots {
        let start = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2019, 1, 1, 2, 0, 0).unwrap();
        Snapshots::half_hourly(start, end).unwrap()
    }

    #[test]
    fn test_duplicate_bus_rejected() {
        let mut network = Network::new(snaps());
        network.add_bus(Bus::new("heat_bus", Carrier::Heat)).unwrap();
        let result = network.add_bus(Bus::new("heat_bus", Carrier::Heat));
        assert!(matches!(result, Err(Error::Duplicate { .. })));
    }

    #[test]
    fn test_load_requires_known_bus() {
        let clock = snaps();
        let demand = Series::constant(&clock, 1.0);
        let mut network = Network::new(clock);
        let result = network.add_load(Load::new("heat_load", "nowhere", demand));
        assert!(matches!(result, Err(Error::UnknownBus { .. })));
    }

    #[test]
    fn test_load_requires_aligned_demand() {
        let clock = snaps();
        let other_start = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let other = Snapshots::half_hourly(other_start, other_start).unwrap();
        let demand = Series::constant(&other, 1.0);

        let mut network = Network::new(clock);
        network.add_bus(Bus::new("heat_bus", Carrier::Heat)).unwrap();
        let result = network.add_load(Load::new("heat_load", "heat_bus", demand));
        assert!(result.is_err());
    }

    #[test]
    fn test_link_requires_both_buses() {
        let mut network = Network::new(snaps());
        network.add_bus(Bus::new("gas_bus", Carrier::Gas)).unwrap();
        let result = network.add_link(Link::new("boiler", "gas_bus", "heat_bus", 8000.0));
        assert!(matches!(result, Err(Error::UnknownBus { .. })));
    }

    #[test]
    fn test_lookup_by_name() {
        let clock = snaps();
        let mut network = Network::new(clock.clone());
        network.add_bus(Bus::new("gas_bus", Carrier::Gas)).unwrap();
        network
            .add_generator(Generator::new(
                "gas_market",
                "gas_bus",
                Series::constant(&clock, 3.0),
                8000.0,
            ))
            .unwrap();

        assert!(network.generator("gas_market").is_some());
        assert!(network.generator("missing").is_none());
        assert_eq!(network.generators().len(), 1);
    }
}
