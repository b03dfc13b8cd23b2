use tandem_physics::PhysicsError;
use tandem_shapes::ShapeError;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("no {0} was provided at init")]
    MissingCollaborator(&'static str),
    #[error("frame loop is stopped")]
    Stopped,
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}
