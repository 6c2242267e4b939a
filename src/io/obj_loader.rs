use crate::error::{RasterError, Result};
use crate::material_system::materials::{Mesh, ModelData, Vertex};
use crate::material_system::texture::{Texture, TextureRegistry};
use log::{debug, info, warn};
use nalgebra::{Point3, Vector2, Vector3};
use std::collections::HashMap;
use std::path::Path;

/// 加载阶段的产物：场景缓冲区与其引用的全部纹理
#[derive(Debug)]
pub struct LoadedScene {
    pub model: ModelData,
    pub textures: TextureRegistry,
}

/// 从文件路径中提取基本文件名（不含扩展名）
fn get_basename_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

/// 加载 OBJ 模型及其 MTL 中引用的漫反射纹理
pub fn load_obj_model<P: AsRef<Path>>(obj_path: P) -> Result<LoadedScene> {
    let obj_path_ref = obj_path.as_ref();
    info!("加载 OBJ 文件: {:?}", obj_path_ref);

    // 确定加载纹理的基础路径
    let base_path = obj_path_ref.parent().unwrap_or_else(|| Path::new("."));

    let load_options = tobj::LoadOptions {
        triangulate: true,   // 将所有面转换为三角形
        single_index: false, // 保持独立的索引以处理分开的纹理/法线坐标
        ignore_points: true, // 忽略点元素
        ignore_lines: true,  // 忽略线元素
        ..Default::default()
    };

    let (models, materials_result) =
        tobj::load_obj(obj_path_ref, &load_options).map_err(|source| RasterError::ObjLoad {
            path: obj_path_ref.to_path_buf(),
            source,
        })?;

    // tobj 在多索引模式下会为缺失的 vt/vn 补一个已有索引，需要从源文件判断真实情况
    let source = std::fs::read_to_string(obj_path_ref)?;
    let corners = scan_face_corners(&source);
    let total_indices: usize = models.iter().map(|m| m.mesh.indices.len()).sum();
    let corners = if corners.len() == total_indices {
        Some(corners)
    } else {
        warn!(
            "面顶点扫描结果 ({}) 与 tobj 索引数 ({}) 不一致，按 tobj 索引处理",
            corners.len(),
            total_indices
        );
        None
    };

    let materials = materials_result.unwrap_or_else(|e| {
        warn!("加载材质失败: {}", e);
        Vec::new()
    });
    info!("从 MTL 加载了 {} 个材质", materials.len());

    // 每个不同的漫反射纹理只加载一次
    let mut textures = TextureRegistry::new();
    for material in &materials {
        let Some(tex_name) = material.diffuse_texture.as_deref() else {
            debug!("材质 '{}' 没有漫反射纹理", material.name);
            continue;
        };
        if tex_name.is_empty() || textures.contains(tex_name) {
            continue;
        }
        let texture = Texture::from_file(base_path.join(tex_name))?;
        textures.insert(tex_name, texture);
    }
    if textures.is_empty() {
        warn!("没有加载任何漫反射纹理");
    }

    let mut model = ModelData {
        name: get_basename_from_path(obj_path_ref),
        ..Default::default()
    };

    let mut corner_cursor = 0;
    for shape in &models {
        let mesh = &shape.mesh;
        let shape_corners = corners
            .as_deref()
            .map(|all| &all[corner_cursor..corner_cursor + mesh.indices.len()]);
        corner_cursor += mesh.indices.len();
        if mesh.indices.is_empty() {
            debug!("跳过没有索引的网格 '{}'", shape.name);
            continue;
        }

        // 每个网格固定一个材质，不支持逐面材质
        let material = mesh
            .material_id
            .and_then(|id| materials.get(id))
            .ok_or_else(|| RasterError::MeshWithoutMaterial(shape.name.clone()))?;

        let index_offset = model.indices.len();
        let unique_before = model.vertices.len();
        append_shape_vertices(mesh, shape_corners, &mut model.vertices, &mut model.indices)?;

        let new_mesh = Mesh {
            name: shape.name.clone(),
            index_offset,
            index_count: mesh.indices.len(),
            texture_name: material.diffuse_texture.clone().unwrap_or_default(),
        };
        debug!(
            "处理网格 '{}': {} 个唯一顶点, {} 个三角形, 纹理 '{}'",
            new_mesh.name,
            model.vertices.len() - unique_before,
            new_mesh.triangle_count(),
            new_mesh.texture_name
        );
        model.meshes.push(new_mesh);
    }

    model.validate()?;
    info!(
        "模型 '{}' 加载完成: {} 个网格, {} 个顶点, {} 个三角形, {} 张纹理",
        model.name,
        model.meshes.len(),
        model.vertices.len(),
        model.triangle_count(),
        textures.len()
    );

    Ok(LoadedScene { model, textures })
}

/// 源文件中一个面顶点（三角化之后）是否自带纹理坐标与法线
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FaceCorner {
    has_texcoord: bool,
    has_normal: bool,
}

/// 按文件顺序扫描 `f`/`l` 行，按 tobj 的扇形三角化展开成面顶点序列。
///
/// 少于3个顶点的元素（点、线）被忽略，与加载选项一致。
fn scan_face_corners(source: &str) -> Vec<FaceCorner> {
    let mut corners = Vec::new();
    for line in source.lines() {
        let mut words = line.split_whitespace();
        if !matches!(words.next(), Some("f") | Some("l")) {
            continue;
        }
        let face: Vec<FaceCorner> = words
            .map(|word| {
                let mut parts = word.split('/').skip(1);
                FaceCorner {
                    has_texcoord: parts.next().is_some_and(|p| !p.is_empty()),
                    has_normal: parts.next().is_some_and(|p| !p.is_empty()),
                }
            })
            .collect();
        // (0, k-1, k) 扇形
        for k in 2..face.len() {
            corners.extend_from_slice(&[face[0], face[k - 1], face[k]]);
        }
    }
    corners
}

/// 按 (位置, 法线, 纹理坐标) 索引组合去重，追加到全局顶点与索引缓冲区
fn append_shape_vertices(
    mesh: &tobj::Mesh,
    corners: Option<&[FaceCorner]>,
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
) -> Result<()> {
    let mut index_map: HashMap<(u32, Option<u32>, Option<u32>), u32> = HashMap::new();

    for (i, &pos_idx) in mesh.indices.iter().enumerate() {
        let corner = corners.map(|c| c[i]);
        let norm_idx = mesh
            .normal_indices
            .get(i)
            .copied()
            .filter(|_| corner.is_none_or(|c| c.has_normal));
        let tc_idx = mesh
            .texcoord_indices
            .get(i)
            .copied()
            .filter(|_| corner.is_none_or(|c| c.has_texcoord));
        let key = (pos_idx, norm_idx, tc_idx);

        if let Some(&existing) = index_map.get(&key) {
            indices.push(existing);
            continue;
        }

        let position = read_vec3(&mesh.positions, pos_idx).ok_or(RasterError::IndexOutOfRange {
            index: pos_idx,
            vertex_count: mesh.positions.len() / 3,
        })?;

        // 法线原样保留，不做归一化
        let normal = match norm_idx {
            Some(idx) => read_vec3(&mesh.normals, idx).unwrap_or_else(|| {
                warn!("遇到无效的 OBJ 法线索引 {}", idx);
                [0.0; 3]
            }),
            None => [0.0; 3],
        };

        // 纹理坐标：u 取绝对值，v 翻转后取绝对值
        let texcoord = match tc_idx {
            Some(idx) => match read_vec2(&mesh.texcoords, idx) {
                Some([u, v]) => Vector2::new(u.abs(), (1.0 - v).abs()),
                None => {
                    warn!("遇到无效的 OBJ 纹理坐标索引 {}", idx);
                    Vector2::zeros()
                }
            },
            None => Vector2::zeros(),
        };

        let new_idx = vertices.len() as u32;
        vertices.push(Vertex::new(
            Point3::from(position),
            Vector3::from(normal),
            texcoord,
        ));
        index_map.insert(key, new_idx);
        indices.push(new_idx);
    }
    Ok(())
}

fn read_vec3(data: &[f32], idx: u32) -> Option<[f32; 3]> {
    let start = idx as usize * 3;
    data.get(start..start + 3).map(|s| [s[0], s[1], s[2]])
}

fn read_vec2(data: &[f32], idx: u32) -> Option<[f32; 2]> {
    let start = idx as usize * 2;
    data.get(start..start + 2).map(|s| [s[0], s[1]])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const QUAD_OBJ: &str = "\
mtllib scene.mtl
o quad
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 2
usemtl textured
f 1/1/1 2/2/1 3/3/1
f 1/1/1 3/3/1 4/4/1
o plain
v 0 0 1
v 1 0 1
v 0 1 1
usemtl untextured
f 5 6 7
";

    const SCENE_MTL: &str = "\
newmtl textured
Kd 1 1 1
map_Kd checker.png

newmtl untextured
Kd 0.5 0.5 0.5
";

    fn fixture_dir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    fn write_checker(dir: &Path) {
        image::RgbImage::from_fn(2, 2, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgb([255, 255, 255])
            } else {
                image::Rgb([0, 0, 0])
            }
        })
        .save(dir.join("checker.png"))
        .unwrap();
    }

    #[test]
    fn loads_meshes_with_deduplicated_vertices() {
        let dir = fixture_dir();
        fs::write(dir.path().join("scene.obj"), QUAD_OBJ).unwrap();
        fs::write(dir.path().join("scene.mtl"), SCENE_MTL).unwrap();
        write_checker(dir.path());

        let scene = load_obj_model(dir.path().join("scene.obj")).unwrap();
        let model = &scene.model;

        assert_eq!(model.name, "scene");
        assert_eq!(model.vertices.len(), 7);
        assert_eq!(model.indices.len(), 9);
        assert_eq!(&model.indices[..6], &[0, 1, 2, 0, 2, 3]);

        assert_eq!(model.meshes.len(), 2);
        assert_eq!(model.meshes[0].name, "quad");
        assert_eq!(model.meshes[0].index_offset, 0);
        assert_eq!(model.meshes[0].index_count, 6);
        assert_eq!(model.meshes[0].texture_name, "checker.png");
        assert_eq!(model.meshes[1].index_offset, 6);
        assert_eq!(model.meshes[1].index_count, 3);
        assert_eq!(model.meshes[1].texture_name, "");

        // v 翻转；法线不归一化
        assert_eq!(model.vertices[0].texcoord, Vector2::new(0.0, 1.0));
        assert_eq!(model.vertices[2].texcoord, Vector2::new(1.0, 0.0));
        assert_eq!(model.vertices[0].normal, Vector3::new(0.0, 0.0, 2.0));
        // 缺少法线与纹理坐标时补零
        assert_eq!(model.vertices[4].normal, Vector3::zeros());
        assert_eq!(model.vertices[4].texcoord, Vector2::zeros());

        assert_eq!(scene.textures.len(), 1);
        let checker = scene.textures.get(scene.textures.resolve("checker.png").unwrap());
        assert_eq!((checker.width, checker.height, checker.channels), (2, 2, 3));
        assert!(scene.textures.resolve("").is_err());

    }

    const MIXED_OBJ: &str = "\
mtllib scene.mtl
o a
v 0 0 0
v 1 0 0
v 0 1 0
v 1 1 0
v 2 0 0
v 2 1 0
vt 0.25 0.25
vn 0 0 7
usemtl textured
f 1/1/1 2/1/1 3/1/1
f 2 4 3
o b
usemtl textured
f 4 5 6
";

    #[test]
    fn faces_without_texcoords_or_normals_get_zeros() {
        let dir = fixture_dir();
        fs::write(dir.path().join("mixed.obj"), MIXED_OBJ).unwrap();
        fs::write(dir.path().join("scene.mtl"), SCENE_MTL).unwrap();
        write_checker(dir.path());

        let model = load_obj_model(dir.path().join("mixed.obj")).unwrap().model;

        // 同一位置在有/无属性的面中是两个不同的顶点
        assert_eq!(model.vertices.len(), 9);
        assert_eq!(model.indices, (0..9).collect::<Vec<u32>>());

        let textured = &model.vertices[0];
        assert_eq!(textured.normal, Vector3::new(0.0, 0.0, 7.0));
        assert_eq!(textured.texcoord, Vector2::new(0.25, 0.75));

        let bare_in_same_shape = &model.vertices[3];
        assert_eq!(bare_in_same_shape.position, Point3::new(1.0, 0.0, 0.0));
        assert_eq!(bare_in_same_shape.normal, Vector3::zeros());
        assert_eq!(bare_in_same_shape.texcoord, Vector2::zeros());

        for vertex in &model.vertices[6..] {
            assert_eq!(vertex.normal, Vector3::zeros());
            assert_eq!(vertex.texcoord, Vector2::zeros());
        }
    }

    #[test]
    fn face_scan_follows_fan_triangulation() {
        let corners = scan_face_corners("# comment\nf 1/1 2//3 3/2/1 4\nl 1 2\nvt 0 0\n");
        let flags: Vec<(bool, bool)> = corners
            .iter()
            .map(|c| (c.has_texcoord, c.has_normal))
            .collect();
        assert_eq!(
            flags,
            vec![
                (true, false),
                (false, true),
                (true, true),
                (true, false),
                (true, true),
                (false, false),
            ]
        );
    }

    #[test]
    fn mesh_without_material_is_an_error() {
        let dir = fixture_dir();
        let obj_path = dir.path().join("bare.obj");
        fs::write(&obj_path, "o bare\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        let result = load_obj_model(&obj_path);
        assert!(matches!(result, Err(RasterError::MeshWithoutMaterial(name)) if name == "bare"));

    }

    #[test]
    fn unreadable_texture_is_an_error() {
        let dir = fixture_dir();
        fs::write(dir.path().join("scene.obj"), QUAD_OBJ).unwrap();
        fs::write(dir.path().join("scene.mtl"), SCENE_MTL).unwrap();

        let result = load_obj_model(dir.path().join("scene.obj"));
        assert!(matches!(result, Err(RasterError::TextureLoad { .. })));

    }

    #[test]
    fn missing_obj_file_is_an_error() {
        let result = load_obj_model("/nonexistent/soft_raster/scene.obj");
        assert!(matches!(result, Err(RasterError::ObjLoad { .. })));
    }
}
