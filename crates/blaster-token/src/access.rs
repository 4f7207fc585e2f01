use blaster_core::error::BlasterError;
use blaster_core::types::Address;

/// Capability check for administrative operations on an asset.
pub fn require_owner(owner: &Address, caller: &Address) -> Result<(), BlasterError> {
    if owner != caller {
        return Err(BlasterError::NotOwner(*caller));
    }
    Ok(())
}

/// Capability check for supply changes on mintable assets (pool shares,
/// wrapped native). Taxed coins have no minter.
pub fn require_minter(minter: Option<&Address>, caller: &Address) -> Result<(), BlasterError> {
    match minter {
        Some(m) if m == caller => Ok(()),
        _ => Err(BlasterError::NotMinter(*caller)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_check() {
        let owner = Address::from_label("owner");
        let other = Address::from_label("other");
        assert!(require_owner(&owner, &owner).is_ok());
        assert!(matches!(require_owner(&owner, &other), Err(BlasterError::NotOwner(a)) if a == other));
    }

    #[test]
    fn minter_check() {
        let minter = Address::from_label("pair");
        assert!(require_minter(Some(&minter), &minter).is_ok());
        assert!(require_minter(None, &minter).is_err());
        assert!(require_minter(Some(&minter), &Address::from_label("x")).is_err());
    }
}
