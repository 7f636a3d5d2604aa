/// Router Module Index
///
/// Console pages are registered from the route table and split by
/// visibility, mirroring the table's public/protected partition. Both page
/// groups sit behind the gate middleware (`handlers::gate_middleware`),
/// which resolves the route, builds the session context once, and decides
/// between rendering and redirecting. Only the protected group can actually
/// be turned away.
///
/// Paths come from `PathPattern::to_axum_path`, so `/leads/:id` in the table
/// is registered as `/leads/{id}` here.

/// Pages anyone can open (login, register), plus the service endpoints
/// (`/health`, `/api/navigate`) that live outside the route table.
pub mod public;

/// Pages that need an authenticated session. Anonymous visitors are sent to
/// `/login`; `/` always forwards to `/dashboard`.
pub mod protected;
