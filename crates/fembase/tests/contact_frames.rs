//! Dual bases and normal-tangential frames on boundary meshes.

use std::collections::HashMap;

use fembase::{
    compute_normal_tangential_frames, Configuration, Element, ElementEvaluator, ElementKind,
    ElementLibrary, FemError, FieldValue, KernelConfig, NORMAL_FIELD, NodeId, ROTATION_FIELD,
};

fn boundary_mesh(
    library: &ElementLibrary,
    kind: ElementKind,
    coords: &[(NodeId, Vec<f64>)],
    connectivity: &[Vec<NodeId>],
) -> Vec<Element> {
    let nodes: HashMap<NodeId, Vec<f64>> = coords.iter().cloned().collect();
    connectivity
        .iter()
        .enumerate()
        .map(|(id, conn)| {
            let mut element = library.create_element(id + 1, kind, conn.clone()).unwrap();
            element.set_nodal_field("geometry", &nodes).unwrap();
            element
        })
        .collect()
}

#[test]
fn dual_basis_is_biorthogonal_on_distorted_quad() {
    let library = ElementLibrary::new().unwrap();
    let elements = boundary_mesh(
        &library,
        ElementKind::Quad4,
        &[
            (1, vec![0.0, 0.0]),
            (2, vec![2.0, 0.2]),
            (3, vec![2.3, 1.5]),
            (4, vec![-0.1, 1.0]),
        ],
        &[vec![1, 2, 3, 4]],
    );
    let eval = ElementEvaluator::default();
    let dual = eval.dual_basis(&elements[0], 0.0).unwrap();

    let am = dual.a() * dual.m();
    assert!((am - dual.d()).norm() < 1e-10);

    // D is diagonal and its trace is the element area
    let area = eval.measure(&elements[0], 0.0, Configuration::Reference).unwrap();
    assert!((dual.d().trace() - area).abs() < 1e-10);
    for i in 0..4 {
        for j in 0..4 {
            if i != j {
                assert_eq!(dual.d()[(i, j)], 0.0);
            }
        }
    }

    // columns of A sum to one, so the dual functions also sum to one
    let n = elements[0].reference().basis(&[0.1, 0.2]).unwrap();
    let psi = dual.evaluate(&n);
    assert_eq!(psi.len(), 4);
    assert!((psi.sum() - 1.0).abs() < 1e-10);
}

#[test]
fn dual_basis_for_every_kind() {
    let library = ElementLibrary::new().unwrap();
    let eval = ElementEvaluator::default();
    for kind in ElementKind::ALL {
        let mut element = library
            .create_element(1, kind, (1..=kind.num_nodes()).collect())
            .unwrap();
        let geometry = element.reference().coordinates().clone();
        element.set_field("geometry", FieldValue::Nodal(geometry)).unwrap();

        let dual = eval
            .dual_basis(&element, 0.0)
            .unwrap_or_else(|err| panic!("{kind}: {err}"));
        let residual = (dual.a() * dual.m() - dual.d()).norm();
        assert!(residual < 1e-10, "{kind}: |A*M - D| = {residual:e}");

        let volume = kind.topology().reference_measure();
        assert!((dual.d().trace() - volume).abs() < 1e-10, "{kind}");
    }
}

#[test]
fn collinear_segments_share_downward_normal() {
    let library = ElementLibrary::new().unwrap();
    let mut elements = boundary_mesh(
        &library,
        ElementKind::Seg2,
        &[(1, vec![0.0, 0.0]), (2, vec![1.0, 0.0]), (3, vec![2.0, 0.0])],
        &[vec![1, 2], vec![2, 3]],
    );
    let eval = ElementEvaluator::default();
    let frames =
        compute_normal_tangential_frames(&eval, &mut elements, 0.0, Configuration::Reference)
            .unwrap();

    assert_eq!(frames.len(), 3);
    let shared = &frames[&2];
    assert!(shared.normal[0].abs() < 1e-14);
    assert!((shared.normal[1] + 1.0).abs() < 1e-14);
    assert!((shared.tangents[0][0] - 1.0).abs() < 1e-14);

    // stored on both elements at the shared node
    for element in &elements {
        let normals = element.field(NORMAL_FIELD, 0.0).unwrap().as_nodal().unwrap();
        let local = element.connectivity().iter().position(|&n| n == 2).unwrap();
        assert!((normals[(1, local)] + 1.0).abs() < 1e-14);

        let rotations = element
            .field(ROTATION_FIELD, 0.0)
            .unwrap()
            .as_nodal_tensor()
            .unwrap();
        assert_eq!(rotations.len(), 2);
        assert_eq!(rotations[local].shape(), (2, 2));
        assert!((rotations[local][(1, 0)] + 1.0).abs() < 1e-14);
    }
}

#[test]
fn frames_follow_the_deformed_configuration() {
    let library = ElementLibrary::new().unwrap();
    let mut elements = boundary_mesh(
        &library,
        ElementKind::Seg2,
        &[(1, vec![0.0, 0.0]), (2, vec![1.0, 0.0])],
        &[vec![1, 2]],
    );
    let mut displacement = HashMap::new();
    displacement.insert(1, vec![0.0, 0.0]);
    displacement.insert(2, vec![-1.0, 1.0]);
    elements[0]
        .update_nodal_field("displacement", 2.0, &displacement)
        .unwrap();

    let eval = ElementEvaluator::default();
    let frames =
        compute_normal_tangential_frames(&eval, &mut elements, 2.0, Configuration::Deformed)
            .unwrap();
    for frame in frames.values() {
        assert!((frame.normal[0] - 1.0).abs() < 1e-14);
        assert!(frame.normal[1].abs() < 1e-14);
    }
    assert_eq!(
        elements[0].fields().times(NORMAL_FIELD),
        Some(vec![2.0])
    );
}

#[test]
fn flat_quads_in_3d() {
    let library = ElementLibrary::new().unwrap();
    let mut elements = boundary_mesh(
        &library,
        ElementKind::Quad4,
        &[
            (1, vec![0.0, 0.0, 0.0]),
            (2, vec![1.0, 0.0, 0.0]),
            (3, vec![2.0, 0.0, 0.0]),
            (4, vec![0.0, 1.0, 0.0]),
            (5, vec![1.0, 1.0, 0.0]),
            (6, vec![2.0, 1.0, 0.0]),
        ],
        &[vec![1, 2, 5, 4], vec![2, 3, 6, 5]],
    );
    let config = KernelConfig {
        frame_integration_order: Some(3),
        ..KernelConfig::default()
    };
    let eval = ElementEvaluator::new(config).unwrap();
    let frames =
        compute_normal_tangential_frames(&eval, &mut elements, 0.0, Configuration::Reference)
            .unwrap();

    assert_eq!(frames.len(), 6);
    for frame in frames.values() {
        assert!((frame.normal[2] - 1.0).abs() < 1e-14);
        assert_eq!(frame.tangents.len(), 2);
        assert!((frame.tangents[0][1] - 1.0).abs() < 1e-14);
        assert!((frame.tangents[1][0] + 1.0).abs() < 1e-14);

        let r = frame.rotation();
        assert!((r.determinant() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn opposing_segments_have_no_normal() {
    let library = ElementLibrary::new().unwrap();
    let mut elements = boundary_mesh(
        &library,
        ElementKind::Seg2,
        &[(1, vec![0.0, 0.0]), (2, vec![1.0, 0.0]), (3, vec![2.0, 0.0])],
        &[vec![1, 2], vec![3, 2]],
    );
    let eval = ElementEvaluator::default();
    let err = compute_normal_tangential_frames(&eval, &mut elements, 0.0, Configuration::Reference)
        .unwrap_err();
    assert!(matches!(err, FemError::DegenerateNormal { node: 2, .. }));
    assert!(!elements[0].has_field(NORMAL_FIELD));
}

#[test]
fn volume_elements_are_rejected() {
    let library = ElementLibrary::new().unwrap();
    let mut elements = boundary_mesh(
        &library,
        ElementKind::Tri3,
        &[(1, vec![0.0, 0.0]), (2, vec![1.0, 0.0]), (3, vec![0.0, 1.0])],
        &[vec![1, 2, 3]],
    );
    let eval = ElementEvaluator::default();
    let err = compute_normal_tangential_frames(&eval, &mut elements, 0.0, Configuration::Reference)
        .unwrap_err();
    assert!(matches!(err, FemError::Unsupported(_)));
}

#[test]
fn failed_write_back_leaves_every_element_untouched() {
    let library = ElementLibrary::new().unwrap();
    let mut elements = boundary_mesh(
        &library,
        ElementKind::Seg2,
        &[(1, vec![0.0, 0.0]), (2, vec![1.0, 0.0]), (3, vec![2.0, 0.0])],
        &[vec![1, 2], vec![2, 3]],
    );
    // an older "normal" series of a different shape cannot take the new step
    elements[1]
        .update_field(NORMAL_FIELD, 1.0, FieldValue::nodal_scalars(&[0.0, 0.0]))
        .unwrap();

    let eval = ElementEvaluator::default();
    let err = compute_normal_tangential_frames(&eval, &mut elements, 0.0, Configuration::Reference)
        .unwrap_err();
    assert!(matches!(err, FemError::InvalidTimeSeries { .. }));

    assert!(!elements[0].has_field(NORMAL_FIELD));
    assert!(!elements[0].has_field(ROTATION_FIELD));
    assert!(!elements[1].has_field(ROTATION_FIELD));
    assert_eq!(elements[1].fields().times(NORMAL_FIELD), Some(vec![1.0]));
}

#[test]
fn non_finite_geometry_has_no_normal() {
    let library = ElementLibrary::new().unwrap();
    let mut elements = boundary_mesh(
        &library,
        ElementKind::Seg2,
        &[(1, vec![0.0, 0.0]), (2, vec![f64::NAN, 0.0])],
        &[vec![1, 2]],
    );
    let eval = ElementEvaluator::default();
    let err = compute_normal_tangential_frames(&eval, &mut elements, 0.0, Configuration::Reference)
        .unwrap_err();
    assert!(matches!(err, FemError::DegenerateNormal { node: 1, length } if length.is_nan()));
    assert!(!elements[0].has_field(NORMAL_FIELD));
}
