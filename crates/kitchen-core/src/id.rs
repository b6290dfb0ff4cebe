use slotmap::new_key_type;

new_key_type! {
    /// Identifies a chef on the stage.
    ///
    /// Stations hold chef ids, never chefs: a binding is a lookup key, so a
    /// released or stale binding cannot dangle.
    pub struct ChefId;

    /// Identifies a station on the stage.
    pub struct StationId;
}

/// Milliseconds on the stage clock.
pub type Millis = u64;

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn chef_ids_are_distinct() {
        let mut chefs: SlotMap<ChefId, &str> = SlotMap::with_key();
        let a = chefs.insert("alice");
        let b = chefs.insert("bob");
        assert_ne!(a, b);
        assert_eq!(chefs[a], "alice");
    }

    #[test]
    fn removed_station_id_does_not_resolve() {
        let mut stations: SlotMap<StationId, u32> = SlotMap::with_key();
        let id = stations.insert(7);
        stations.remove(id);
        let other = stations.insert(8);
        assert!(stations.get(id).is_none());
        assert_eq!(stations[other], 8);
    }
}
