// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use understory_event_state::drag::BoundsError;

use crate::NodeId;

/// Structural edit rejected by the [`crate::Scene`].
#[derive(Copy, Clone, Debug, PartialEq, thiserror::Error)]
pub enum SceneError {
    /// The identifier refers to a removed node.
    #[error("node {0:?} is no longer in the scene")]
    StaleNode(NodeId),
    /// Children were attached to a shape.
    #[error("node {0:?} is a shape and cannot hold children")]
    NotAContainer(NodeId),
    /// Shape content was set on a node that is not a shape.
    #[error("node {0:?} is not a shape")]
    NotAShape(NodeId),
    /// A layer was placed anywhere but directly under the stage.
    #[error("layers can only be children of the stage")]
    LayerParentMustBeStage,
    /// A group or shape was placed directly under the stage.
    #[error("the stage only accepts layers as children")]
    StageChildMustBeLayer,
    /// The stage was asked to move or leave the scene.
    #[error("the stage cannot be removed or reparented")]
    StageHasNoParent,
    /// The node would become its own ancestor.
    #[error("node {0:?} cannot be moved below itself")]
    Cycle(NodeId),
    /// Drag options with contradictory bounds.
    #[error(transparent)]
    InvalidDragBounds(#[from] BoundsError),
}
