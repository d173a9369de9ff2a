//! Site ownership.

use hexkit_world::{EntityCategory, WorldState};

use crate::error::InvalidCommand;
use crate::payload::PointArgs;
use crate::resolve::{get_optional_faction, get_site};
use crate::results::InstructionResults;

/// Transfers a site and all terrain on it to the faction `args.id`, or to no
/// one if the identifier is empty. Terrain influence is bracketed.
pub(super) fn set_owner(
    name: &'static str,
    args: &PointArgs,
    world: &mut WorldState,
    results: Option<&mut InstructionResults>,
) -> Result<bool, InvalidCommand> {
    let site = get_site(world, name, args.location)?;
    let owner = get_optional_faction(world, name, &args.id)?;
    if site.owner() == owner.as_ref() {
        return Ok(false);
    }
    let original = site
        .owner()
        .and_then(|current| world.faction(current.as_str()))
        .cloned();

    let terrain = world.entities_on(args.location, EntityCategory::Terrain);
    for id in &terrain {
        world.remove_influence(id.as_str());
    }
    world.set_site_owner(args.location, owner);
    for id in &terrain {
        world.add_influence(id.as_str());
    }

    if let Some(results) = results {
        results.site = world.site(args.location).cloned();
        results.faction = original;
    }
    Ok(true)
}
