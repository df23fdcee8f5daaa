pub(crate) mod asset_group;
