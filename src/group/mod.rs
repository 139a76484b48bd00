//! Groups of people who share expenses, and the pages for managing them.

mod core;
mod create_endpoint;
mod delete_endpoint;
mod group_page;
mod groups_page;
mod member_endpoint;

pub use core::{
    Group, GroupId, Member, add_member, create_group, create_group_tables, delete_group,
    get_group, get_groups_for_user, get_members, is_member, require_membership,
};
pub use create_endpoint::create_group_endpoint;
pub use delete_endpoint::delete_group_endpoint;
pub use group_page::get_group_page;
pub use groups_page::get_groups_page;
pub use member_endpoint::add_member_endpoint;
