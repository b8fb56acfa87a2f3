#[macro_use]
pub mod utils;
pub mod pictures;
pub mod status;

pub(super) fn mount(app: &mut tide::Server<crate::State>) {
    status::mount(app);
    pictures::mount(app.at("/picture"));
}
