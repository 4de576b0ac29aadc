pub mod forum_routes;
