//! glTF parsing.
//!
//! Two entry points, both operating on already-read bytes:
//! - [`parse_character`]: the full document, as node hierarchy, skinned mesh
//!   primitives, materials with base-color textures, and skins.
//! - [`parse_clip`]: the first animation of a document, as an
//!   [`AnimationClip`] whose tracks address nodes by name.
//!
//! The character and its clips ship as separate files recorded against the
//! same rig, so clip tracks resolve against the character's node names.

use glam::{Affine3A, Mat4, Quat, Vec3};

use crate::animation::{AnimationClip, InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData};
use crate::errors::{Result, VitrineError};
use crate::scene::{ImageData, Material, Mesh, Primitive};

/// One node of the character hierarchy, index-addressed as in the document.
#[derive(Debug, Clone)]
pub struct NodeDesc {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub mesh: Option<usize>,
    pub skin: Option<usize>,
    pub children: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct SkinDesc {
    pub name: String,
    /// Joint node indices, in shader palette order.
    pub joints: Vec<usize>,
    pub inverse_bind_matrices: Vec<Mat4>,
}

/// Parsed character document, ready to be bound into a scene graph.
#[derive(Debug, Clone)]
pub struct CharacterAsset {
    pub nodes: Vec<NodeDesc>,
    pub roots: Vec<usize>,
    pub meshes: Vec<Mesh>,
    pub skins: Vec<SkinDesc>,
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map_or_else(|| format!("node_{}", node.index()), str::to_string)
}

/// Parses a character glTF/GLB document.
pub fn parse_character(bytes: &[u8]) -> Result<CharacterAsset> {
    let (document, buffers, images) = gltf::import_slice(bytes)?;

    let nodes = document
        .nodes()
        .map(|node| {
            let (translation, rotation, scale) = match node.transform() {
                gltf::scene::Transform::Matrix { matrix } => {
                    let (scale, rotation, translation) =
                        Affine3A::from_mat4(Mat4::from_cols_array_2d(&matrix))
                            .to_scale_rotation_translation();
                    (translation, rotation, scale)
                }
                gltf::scene::Transform::Decomposed {
                    translation,
                    rotation,
                    scale,
                } => (
                    Vec3::from(translation),
                    Quat::from_array(rotation),
                    Vec3::from(scale),
                ),
            };

            NodeDesc {
                name: node_name(&node),
                translation,
                rotation,
                scale,
                mesh: node.mesh().map(|m| m.index()),
                skin: node.skin().map(|s| s.index()),
                children: node.children().map(|c| c.index()).collect(),
            }
        })
        .collect();

    let roots = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| VitrineError::GltfError("document has no scene".into()))?
        .nodes()
        .map(|n| n.index())
        .collect();

    let meshes = document
        .meshes()
        .map(|mesh| parse_mesh(&mesh, &buffers, &images))
        .collect::<Result<Vec<_>>>()?;

    let skins = document
        .skins()
        .map(|skin| {
            let reader = skin.reader(|buffer| Some(&buffers[buffer.index()]));
            let inverse_bind_matrices = reader
                .read_inverse_bind_matrices()
                .map(|iter| iter.map(|m| Mat4::from_cols_array_2d(&m)).collect())
                .unwrap_or_else(|| vec![Mat4::IDENTITY; skin.joints().count()]);

            SkinDesc {
                name: skin
                    .name()
                    .map_or_else(|| format!("skin_{}", skin.index()), str::to_string),
                joints: skin.joints().map(|j| j.index()).collect(),
                inverse_bind_matrices,
            }
        })
        .collect();

    Ok(CharacterAsset {
        nodes,
        roots,
        meshes,
        skins,
    })
}

fn parse_mesh(
    mesh: &gltf::Mesh,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
) -> Result<Mesh> {
    let name = mesh
        .name()
        .map_or_else(|| format!("mesh_{}", mesh.index()), str::to_string);

    let mut primitives = Vec::new();
    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .ok_or_else(|| VitrineError::GltfError(format!("mesh '{name}' has no positions")))?
            .collect();
        let vertex_count = positions.len();

        let indices: Vec<u32> = reader
            .read_indices()
            .map(|iter| iter.into_u32().collect())
            .unwrap_or_else(|| (0..vertex_count as u32).collect());

        let normals: Vec<[f32; 3]> = reader
            .read_normals()
            .map_or_else(|| compute_normals(&positions, &indices), Iterator::collect);

        let uvs: Vec<[f32; 2]> = reader
            .read_tex_coords(0)
            .map(|tc| tc.into_f32().collect())
            .unwrap_or_else(|| vec![[0.0, 0.0]; vertex_count]);

        let joints: Vec<[u16; 4]> = reader
            .read_joints(0)
            .map(|j| j.into_u16().collect())
            .unwrap_or_else(|| vec![[0; 4]; vertex_count]);

        let weights: Vec<[f32; 4]> = reader
            .read_weights(0)
            .map(|w| w.into_f32().collect())
            .unwrap_or_else(|| vec![[1.0, 0.0, 0.0, 0.0]; vertex_count]);

        primitives.push(Primitive {
            positions,
            normals,
            uvs,
            joints,
            weights,
            indices,
            material: parse_material(&primitive.material(), images),
        });
    }

    Ok(Mesh { name, primitives })
}

fn parse_material(material: &gltf::Material, images: &[gltf::image::Data]) -> Material {
    let pbr = material.pbr_metallic_roughness();

    let base_color_image = pbr.base_color_texture().and_then(|info| {
        let image = images.get(info.texture().source().index())?;
        convert_image(image)
    });

    Material {
        base_color_factor: pbr.base_color_factor(),
        base_color_image,
    }
}

/// Expands the importer's pixel data to RGBA8. Unsupported formats are
/// dropped (the base color factor still applies).
fn convert_image(image: &gltf::image::Data) -> Option<ImageData> {
    use gltf::image::Format;

    let pixel_count = (image.width * image.height) as usize;
    let rgba8 = match image.format {
        Format::R8G8B8A8 => image.pixels.clone(),
        Format::R8G8B8 => {
            let mut out = Vec::with_capacity(pixel_count * 4);
            for rgb in image.pixels.chunks_exact(3) {
                out.extend_from_slice(rgb);
                out.push(0xFF);
            }
            out
        }
        format => {
            log::warn!("Unsupported texture format {format:?}, ignoring texture");
            return None;
        }
    };

    Some(ImageData {
        width: image.width,
        height: image.height,
        rgba8,
    })
}

/// Area-weighted smooth normals for meshes that ship without them.
fn compute_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let pa = Vec3::from(positions[a]);
        let pb = Vec3::from(positions[b]);
        let pc = Vec3::from(positions[c]);
        let face = (pb - pa).cross(pc - pa);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }

    normals
        .into_iter()
        .map(|n| n.normalize_or(Vec3::Y).to_array())
        .collect()
}

/// Parses the first animation of a document into a clip named `id`.
pub fn parse_clip(id: &str, bytes: &[u8]) -> Result<AnimationClip> {
    let (document, buffers, _images) = gltf::import_slice(bytes)?;

    let animation = document
        .animations()
        .next()
        .ok_or_else(|| VitrineError::GltfError(format!("clip '{id}' has no animations")))?;

    let mut tracks = Vec::new();
    for channel in animation.channels() {
        let target = channel.target();
        let target_node = node_name(&target.node());
        let reader = channel.reader(|buffer| Some(&buffers[buffer.index()]));

        let times: Vec<f32> = match reader.read_inputs() {
            Some(iter) => iter.collect(),
            None => continue,
        };
        let Some(outputs) = reader.read_outputs() else {
            continue;
        };

        let interpolation = match channel.sampler().interpolation() {
            gltf::animation::Interpolation::Linear => InterpolationMode::Linear,
            gltf::animation::Interpolation::Step => InterpolationMode::Step,
            gltf::animation::Interpolation::CubicSpline => InterpolationMode::CubicSpline,
        };

        use gltf::animation::util::ReadOutputs;
        let (path, data) = match outputs {
            ReadOutputs::Translations(iter) => (
                TargetPath::Translation,
                TrackData::Vector3(KeyframeTrack::new(
                    times,
                    iter.map(Vec3::from).collect(),
                    interpolation,
                )),
            ),
            ReadOutputs::Scales(iter) => (
                TargetPath::Scale,
                TrackData::Vector3(KeyframeTrack::new(
                    times,
                    iter.map(Vec3::from).collect(),
                    interpolation,
                )),
            ),
            ReadOutputs::Rotations(iter) => (
                TargetPath::Rotation,
                TrackData::Quaternion(KeyframeTrack::new(
                    times,
                    iter.into_f32().map(Quat::from_array).collect(),
                    interpolation,
                )),
            ),
            ReadOutputs::MorphTargetWeights(_) => {
                log::debug!("clip '{id}': skipping morph target channel");
                continue;
            }
        };

        tracks.push(Track {
            target_node,
            path,
            data,
        });
    }

    if tracks.is_empty() {
        return Err(VitrineError::GltfError(format!(
            "clip '{id}' has no usable channels"
        )));
    }

    Ok(AnimationClip::new(id.to_string(), tracks))
}
